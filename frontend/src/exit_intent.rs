//! Home-page popup shown when the pointer leaves through the top of the
//! viewport. Once per page load, and not again until the cooldown passes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use crate::dom::{Dom, Event, EventKind, Target};
use crate::platform::Platform;
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::stamp::ExpiringStamp;
use crate::subscription::Subscription;

pub const POPUP_ID: &str = "exit-popup";
pub const CLOSE_ID: &str = "exit-popup-close";

struct Prompt<D: Dom> {
    dom: Rc<D>,
    platform: Platform<D::Node>,
    lock: ScrollLock<D>,
    stamp: ExpiringStamp,
    edge_px: f64,
    shown: Cell<bool>,
    hold: RefCell<Option<ScrollLockGuard<D>>>,
}

impl<D: Dom> Prompt<D> {
    fn on_mouse_out(&self, event: &Event<D::Node>) {
        if event.client_y < self.edge_px && !event.has_related_target {
            self.show();
        }
    }

    fn show(&self) {
        if self.shown.get() {
            return;
        }
        let Some(popup) = self.dom.element_by_id(POPUP_ID) else {
            return;
        };
        if self.dom.attribute(&popup, "data-shown").as_deref() == Some("true") {
            return;
        }
        self.shown.set(true);
        self.dom.set_hidden(&popup, false);
        self.dom.set_attribute(&popup, "data-shown", "true");
        *self.hold.borrow_mut() = Some(self.lock.acquire());
        self.stamp
            .stamp(&*self.platform.store, &*self.platform.clock);
        info!("exit intent popup shown");
    }

    fn hide(&self) {
        if let Some(popup) = self.dom.element_by_id(POPUP_ID) {
            self.dom.set_hidden(&popup, true);
        }
        self.hold.borrow_mut().take();
    }
}

pub struct ExitIntentPrompt<D: Dom> {
    prompt: Rc<Prompt<D>>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> ExitIntentPrompt<D> {
    pub fn mount(
        dom: Rc<D>,
        platform: Platform<D::Node>,
        lock: &ScrollLock<D>,
        stamp: ExpiringStamp,
        home_page_class: &str,
        edge_px: f64,
    ) -> Option<Self> {
        let on_home = dom
            .body()
            .map_or(false, |body| dom.has_class(&body, home_page_class));
        if !on_home {
            return None;
        }
        if stamp.is_fresh(&*platform.store, &*platform.clock) {
            debug!("exit popup shown recently, skipping");
            return None;
        }

        let prompt = Rc::new(Prompt {
            dom: dom.clone(),
            platform,
            lock: lock.clone(),
            stamp,
            edge_px,
            shown: Cell::new(false),
            hold: RefCell::new(None),
        });

        let mut listeners = Vec::new();
        let p = prompt.clone();
        listeners.push(dom.listen(
            Target::Document,
            EventKind::MouseOut,
            Box::new(move |event: &Event<D::Node>| p.on_mouse_out(event)),
        ));
        if let Some(close) = dom.element_by_id(CLOSE_ID) {
            let p = prompt.clone();
            listeners.push(dom.listen(
                Target::Node(close),
                EventKind::Click,
                Box::new(move |_: &Event<D::Node>| p.hide()),
            ));
        }
        if let Some(popup) = dom.element_by_id(POPUP_ID) {
            let p = prompt.clone();
            let overlay = popup.clone();
            listeners.push(dom.listen(
                Target::Node(popup),
                EventKind::Click,
                Box::new(move |event: &Event<D::Node>| {
                    if event.target.as_ref() == Some(&overlay) {
                        p.hide();
                    }
                }),
            ));
        }

        Some(Self {
            prompt,
            _listeners: listeners,
        })
    }

    pub fn show(&self) {
        self.prompt.show();
    }

    pub fn hide(&self) {
        self.prompt.hide();
    }

    pub fn was_shown(&self) -> bool {
        self.prompt.shown.get()
    }

    pub fn is_visible(&self) -> bool {
        self.prompt.hold.borrow().is_some()
    }
}
