//! Bar Council disclaimer: the site stays behind an overlay until the
//! visitor acknowledges it. Acceptance is remembered for a fixed window.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::dom::{Dom, Event, EventKind, Target};
use crate::platform::Platform;
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::stamp::ExpiringStamp;
use crate::subscription::Subscription;

pub const OVERLAY_ID: &str = "disclaimer-overlay";
pub const ACCEPT_ID: &str = "disclaimer-accept";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Hidden,
    Shown,
}

struct Gate<D: Dom> {
    dom: Rc<D>,
    platform: Platform<D::Node>,
    overlay: D::Node,
    stamp: ExpiringStamp,
    // Some while the overlay is shown.
    hold: RefCell<Option<ScrollLockGuard<D>>>,
}

impl<D: Dom> Gate<D> {
    fn accept(&self) {
        if self.hold.borrow().is_none() {
            return;
        }
        self.stamp
            .stamp(&*self.platform.store, &*self.platform.clock);
        self.dom.set_hidden(&self.overlay, true);
        self.hold.borrow_mut().take();
        info!("disclaimer accepted");
    }
}

pub struct ConsentGate<D: Dom> {
    gate: Rc<Gate<D>>,
    _listeners: Vec<Subscription>,
}

impl<D: Dom> ConsentGate<D> {
    pub fn mount(
        dom: Rc<D>,
        platform: Platform<D::Node>,
        lock: &ScrollLock<D>,
        stamp: ExpiringStamp,
    ) -> Option<Self> {
        let Some(overlay) = dom.element_by_id(OVERLAY_ID) else {
            debug!("no #{}, disclaimer inactive", OVERLAY_ID);
            return None;
        };

        let accepted = stamp.is_fresh(&*platform.store, &*platform.clock);
        dom.set_hidden(&overlay, accepted);
        let hold = (!accepted).then(|| lock.acquire());
        let gate = Rc::new(Gate {
            dom: dom.clone(),
            platform,
            overlay,
            stamp,
            hold: RefCell::new(hold),
        });

        let mut listeners = Vec::new();
        if !accepted {
            if let Some(button) = dom.element_by_id(ACCEPT_ID) {
                let g = gate.clone();
                listeners.push(dom.listen(
                    Target::Node(button),
                    EventKind::Click,
                    Box::new(move |_: &Event<D::Node>| g.accept()),
                ));
            }
        }

        Some(Self {
            gate,
            _listeners: listeners,
        })
    }

    pub fn state(&self) -> GateState {
        if self.gate.hold.borrow().is_some() {
            GateState::Shown
        } else {
            GateState::Hidden
        }
    }

    pub fn accept(&self) {
        self.gate.accept();
    }
}
