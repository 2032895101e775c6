//! Testimonials carousel: slide track, prev/next buttons, dot indicators and
//! an autoplay timer that pauses while the pointer is over the track.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::platform::Scheduler;
use crate::subscription::Subscription;

pub const TRACK_CLASS: &str = "testimonials-carousel__track";
pub const SLIDE_CLASS: &str = "testimonials-carousel__slide";
pub const PREV_CLASS: &str = "testimonials-carousel__prev";
pub const NEXT_CLASS: &str = "testimonials-carousel__next";
pub const DOT_CLASS: &str = "testimonials-carousel__dot";
pub const ACTIVE_DOT_CLASS: &str = "testimonials-carousel__dot--active";

struct Slides<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    track: D::Node,
    dots: Vec<D::Node>,
    count: usize,
    period_ms: u32,
    index: Cell<usize>,
    autoplay: RefCell<Option<Subscription>>,
}

impl<D: Dom> Slides<D> {
    fn go_to(&self, index: isize) {
        let index = index.rem_euclid(self.count as isize) as usize;
        self.index.set(index);
        self.dom.set_style(
            &self.track,
            "transform",
            &format!("translateX(-{}%)", index * 100),
        );
        for (i, dot) in self.dots.iter().enumerate() {
            self.dom.set_class(dot, ACTIVE_DOT_CLASS, i == index);
        }
    }

    fn step(&self, delta: isize) {
        self.go_to(self.index.get() as isize + delta);
    }

    fn start(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let timer = self.scheduler.interval(
            self.period_ms,
            Box::new(move || {
                if let Some(slides) = weak.upgrade() {
                    slides.step(1);
                }
            }),
        );
        // Replacing drops, and so cancels, any running timer.
        *self.autoplay.borrow_mut() = Some(timer);
    }

    fn stop(&self) {
        self.autoplay.borrow_mut().take();
    }
}

pub struct Carousel<D: Dom> {
    slides: Rc<Slides<D>>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> Carousel<D> {
    pub fn mount(dom: Rc<D>, scheduler: Rc<dyn Scheduler>, period_ms: u32) -> Option<Self> {
        let Some(track) = dom.select(None, &Selector::class(TRACK_CLASS)) else {
            debug!("no carousel track on this page");
            return None;
        };
        let count = dom.select_all(Some(&track), &Selector::class(SLIDE_CLASS)).len();
        if count == 0 {
            debug!("carousel track has no slides");
            return None;
        }
        let dots = dom.select_all(None, &Selector::class(DOT_CLASS));

        let slides = Rc::new(Slides {
            dom: dom.clone(),
            scheduler,
            track: track.clone(),
            dots: dots.clone(),
            count,
            period_ms,
            index: Cell::new(0),
            autoplay: RefCell::new(None),
        });

        let mut listeners = Vec::new();
        let buttons = [(PREV_CLASS, -1), (NEXT_CLASS, 1)];
        for (class, delta) in buttons {
            if let Some(button) = dom.select(None, &Selector::class(class)) {
                let s = slides.clone();
                listeners.push(dom.listen(
                    Target::Node(button),
                    EventKind::Click,
                    Box::new(move |_: &Event<D::Node>| s.step(delta)),
                ));
            }
        }
        for (i, dot) in dots.into_iter().enumerate() {
            let s = slides.clone();
            listeners.push(dom.listen(
                Target::Node(dot),
                EventKind::Click,
                Box::new(move |_: &Event<D::Node>| s.go_to(i as isize)),
            ));
        }
        let s = slides.clone();
        listeners.push(dom.listen(
            Target::Node(track.clone()),
            EventKind::MouseEnter,
            Box::new(move |_: &Event<D::Node>| s.stop()),
        ));
        let s = slides.clone();
        listeners.push(dom.listen(
            Target::Node(track),
            EventKind::MouseLeave,
            Box::new(move |_: &Event<D::Node>| s.start()),
        ));

        slides.go_to(0);
        slides.start();
        debug!("carousel with {} slide(s)", count);

        Some(Self {
            slides,
            _listeners: listeners,
        })
    }

    pub fn next(&self) {
        self.slides.step(1);
    }

    pub fn previous(&self) {
        self.slides.step(-1);
    }

    pub fn go_to(&self, index: isize) {
        self.slides.go_to(index);
    }

    pub fn index(&self) -> usize {
        self.slides.index.get()
    }

    pub fn start_autoplay(&self) {
        self.slides.start();
    }

    pub fn stop_autoplay(&self) {
        self.slides.stop();
    }

    pub fn is_autoplaying(&self) -> bool {
        self.slides.autoplay.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use crate::platform::memory::ManualScheduler;
    use pretty_assertions::assert_eq;

    struct Fixture {
        dom: Rc<MemoryDom>,
        scheduler: Rc<ManualScheduler>,
        track: NodeId,
        prev: NodeId,
        next: NodeId,
        dots: Vec<NodeId>,
    }

    fn fixture(slides: usize) -> Fixture {
        let dom = Rc::new(MemoryDom::new());
        let root = dom.append(&dom.body_node(), "div", &[("class", "testimonials-carousel")]);
        let track = dom.append(&root, "div", &[("class", TRACK_CLASS)]);
        for _ in 0..slides {
            dom.append(&track, "div", &[("class", SLIDE_CLASS)]);
        }
        let prev = dom.append(&root, "button", &[("class", PREV_CLASS)]);
        let next = dom.append(&root, "button", &[("class", NEXT_CLASS)]);
        let dots = (0..slides)
            .map(|_| dom.append(&root, "button", &[("class", DOT_CLASS)]))
            .collect();
        Fixture {
            dom,
            scheduler: Rc::new(ManualScheduler::default()),
            track,
            prev,
            next,
            dots,
        }
    }

    fn mount(f: &Fixture) -> Carousel<MemoryDom> {
        Carousel::mount(f.dom.clone(), f.scheduler.clone(), 5000).unwrap()
    }

    fn active_dots(f: &Fixture) -> Vec<usize> {
        f.dots
            .iter()
            .enumerate()
            .filter(|(_, dot)| f.dom.has_class(dot, ACTIVE_DOT_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        let f = fixture(4);
        let carousel = mount(&f);
        assert_eq!(carousel.index(), 0);
        assert_eq!(f.dom.style(&f.track, "transform"), "translateX(-0%)");

        carousel.previous();
        assert_eq!(carousel.index(), 3);
        assert_eq!(f.dom.style(&f.track, "transform"), "translateX(-300%)");
        carousel.next();
        assert_eq!(carousel.index(), 0);

        carousel.go_to(-5);
        assert_eq!(carousel.index(), 3);
        carousel.go_to(9);
        assert_eq!(carousel.index(), 1);
        assert_eq!(active_dots(&f), vec![1]);
    }

    #[test]
    fn buttons_and_dots_drive_the_position() {
        let f = fixture(4);
        let carousel = mount(&f);

        f.dom.click(&f.next);
        f.dom.click(&f.next);
        assert_eq!(carousel.index(), 2);
        f.dom.click(&f.prev);
        assert_eq!(carousel.index(), 1);
        f.dom.click(&f.dots[3]);
        assert_eq!(carousel.index(), 3);
        assert_eq!(active_dots(&f), vec![3]);
    }

    #[test]
    fn autoplay_advances_and_pauses_on_hover() {
        let f = fixture(4);
        let carousel = mount(&f);
        assert!(carousel.is_autoplaying());

        f.scheduler.advance(5000);
        assert_eq!(carousel.index(), 1);
        f.scheduler.advance(10_000);
        assert_eq!(carousel.index(), 3);

        f.dom.mouse_enter(&f.track);
        assert!(!carousel.is_autoplaying());
        f.scheduler.advance(20_000);
        assert_eq!(carousel.index(), 3);

        f.dom.mouse_leave(&f.track);
        f.scheduler.advance(5000);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn restarting_autoplay_keeps_a_single_timer() {
        let f = fixture(4);
        let carousel = mount(&f);
        f.dom.mouse_leave(&f.track);
        f.dom.mouse_leave(&f.track);
        assert_eq!(f.scheduler.pending(), 1);

        f.scheduler.advance(5000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn autoplay_can_be_stopped_and_started_directly() {
        let f = fixture(3);
        let carousel = mount(&f);

        carousel.stop_autoplay();
        carousel.stop_autoplay();
        assert!(!carousel.is_autoplaying());
        assert_eq!(f.scheduler.pending(), 0);
        f.scheduler.advance(15_000);
        assert_eq!(carousel.index(), 0);

        carousel.start_autoplay();
        carousel.start_autoplay();
        assert!(carousel.is_autoplaying());
        assert_eq!(f.scheduler.pending(), 1);
        f.scheduler.advance(5000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn dropping_the_carousel_stops_the_timer() {
        let f = fixture(2);
        let carousel = mount(&f);
        drop(carousel);
        assert_eq!(f.scheduler.pending(), 0);
        assert_eq!(f.dom.listener_count(), 0);
    }

    #[test]
    fn empty_track_is_inactive() {
        let f = fixture(0);
        assert!(Carousel::mount(f.dom.clone(), f.scheduler.clone(), 5000).is_none());
    }
}
