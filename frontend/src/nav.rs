use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, Event, EventKind, Selector, Target};
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::subscription::Subscription;

pub const OPEN_CLASS: &str = "header__nav--open";

struct Menu<D: Dom> {
    dom: Rc<D>,
    toggle: D::Node,
    nav: D::Node,
    lock: ScrollLock<D>,
    hold: RefCell<Option<ScrollLockGuard<D>>>,
}

impl<D: Dom> Menu<D> {
    fn set_open(&self, open: bool) {
        self.dom.set_class(&self.nav, OPEN_CLASS, open);
        self.dom
            .set_attribute(&self.toggle, "aria-expanded", if open { "true" } else { "false" });
        let mut hold = self.hold.borrow_mut();
        match (open, hold.is_some()) {
            (true, false) => *hold = Some(self.lock.acquire()),
            (false, true) => *hold = None,
            _ => {}
        }
    }

    fn is_open(&self) -> bool {
        self.dom.has_class(&self.nav, OPEN_CLASS)
    }
}

/// Mobile navigation drawer.
pub struct NavigationController<D: Dom> {
    menu: Rc<Menu<D>>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> NavigationController<D> {
    pub fn mount(dom: Rc<D>, lock: &ScrollLock<D>) -> Option<Self> {
        let toggle = dom.select(None, &Selector::class("header__mobile-toggle"));
        let nav = dom.select(None, &Selector::class("header__nav"));
        let (Some(toggle), Some(nav)) = (toggle, nav) else {
            debug!("no mobile navigation on this page");
            return None;
        };

        let links = dom.select_all(Some(&nav), &Selector::class("header__nav-link"));
        let menu = Rc::new(Menu {
            dom: dom.clone(),
            toggle: toggle.clone(),
            nav,
            lock: lock.clone(),
            hold: RefCell::new(None),
        });

        let mut listeners = Vec::with_capacity(links.len() + 1);
        let m = menu.clone();
        listeners.push(dom.listen(
            Target::Node(toggle),
            EventKind::Click,
            Box::new(move |_: &Event<D::Node>| m.set_open(!m.is_open())),
        ));
        for link in links {
            let m = menu.clone();
            listeners.push(dom.listen(
                Target::Node(link),
                EventKind::Click,
                Box::new(move |_: &Event<D::Node>| m.set_open(false)),
            ));
        }

        Some(Self {
            menu,
            _listeners: listeners,
        })
    }

    pub fn is_open(&self) -> bool {
        self.menu.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use pretty_assertions::assert_eq;

    fn header(dom: &MemoryDom) -> (NodeId, NodeId, NodeId) {
        let header = dom.append(&dom.body_node(), "header", &[("class", "header")]);
        let toggle = dom.append(
            &header,
            "button",
            &[("class", "header__mobile-toggle"), ("aria-expanded", "false")],
        );
        let nav = dom.append(&header, "nav", &[("class", "header__nav")]);
        let link = dom.append(&nav, "a", &[("class", "header__nav-link"), ("href", "/about.html")]);
        (toggle, nav, link)
    }

    #[test]
    fn toggle_opens_and_closes_with_scroll_lock() {
        let dom = Rc::new(MemoryDom::new());
        let (toggle, nav, _) = header(&dom);
        let lock = ScrollLock::new(dom.clone());
        let controller = NavigationController::mount(dom.clone(), &lock).unwrap();

        dom.click(&toggle);
        assert!(controller.is_open());
        assert!(dom.has_class(&nav, OPEN_CLASS));
        assert_eq!(dom.attribute(&toggle, "aria-expanded").as_deref(), Some("true"));
        assert!(lock.is_locked());

        dom.click(&toggle);
        assert!(!controller.is_open());
        assert_eq!(dom.attribute(&toggle, "aria-expanded").as_deref(), Some("false"));
        assert!(!lock.is_locked());
    }

    #[test]
    fn link_click_closes_the_menu() {
        let dom = Rc::new(MemoryDom::new());
        let (toggle, nav, link) = header(&dom);
        let lock = ScrollLock::new(dom.clone());
        let _controller = NavigationController::mount(dom.clone(), &lock).unwrap();

        dom.click(&toggle);
        dom.click(&link);
        assert!(!dom.has_class(&nav, OPEN_CLASS));
        assert!(!lock.is_locked());
    }

    #[test]
    fn closing_the_menu_leaves_other_holders_locked() {
        let dom = Rc::new(MemoryDom::new());
        let (toggle, _, _) = header(&dom);
        let lock = ScrollLock::new(dom.clone());
        let _controller = NavigationController::mount(dom.clone(), &lock).unwrap();
        let overlay = lock.acquire();

        dom.click(&toggle);
        dom.click(&toggle);
        assert!(lock.is_locked());
        drop(overlay);
        assert!(!lock.is_locked());
    }

    #[test]
    fn missing_markup_is_inactive() {
        let dom = Rc::new(MemoryDom::new());
        let lock = ScrollLock::new(dom.clone());
        assert!(NavigationController::mount(dom, &lock).is_none());
    }
}
