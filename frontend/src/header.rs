use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::subscription::Subscription;

pub const SCROLLED_CLASS: &str = "header--scrolled";

/// Sticky header that changes look once the page is scrolled.
pub struct ScrollHeader<D: Dom> {
    dom: Rc<D>,
    header: D::Node,
    threshold: f64,
    _listener: Subscription,
}

impl<D: Dom> ScrollHeader<D> {
    pub fn mount(dom: Rc<D>, threshold: f64) -> Option<Self> {
        let Some(header) = dom.select(None, &Selector::class("header")) else {
            debug!("no .header, sticky header inactive");
            return None;
        };

        let (d, h) = (dom.clone(), header.clone());
        let listener = dom.listen(
            Target::Window,
            EventKind::Scroll,
            Box::new(move |_: &Event<D::Node>| update(&*d, &h, threshold)),
        );
        update(&*dom, &header, threshold);

        Some(Self {
            dom,
            header,
            threshold,
            _listener: listener,
        })
    }

    pub fn is_scrolled(&self) -> bool {
        self.dom.has_class(&self.header, SCROLLED_CLASS)
    }

    pub fn refresh(&self) {
        update(&*self.dom, &self.header, self.threshold);
    }
}

fn update<D: Dom>(dom: &D, header: &D::Node, threshold: f64) {
    dom.set_class(header, SCROLLED_CLASS, dom.scroll_y() > threshold);
}
