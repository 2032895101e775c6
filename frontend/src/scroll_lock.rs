use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::dom::Dom;

/// Page scroll suppression shared by every overlay.
///
/// Each owner holds a [`ScrollLockGuard`]; `<body>` keeps `overflow: hidden`
/// while at least one guard is alive.
pub struct ScrollLock<D: Dom> {
    dom: Rc<D>,
    holders: Rc<Cell<usize>>,
}

impl<D: Dom> Clone for ScrollLock<D> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            holders: self.holders.clone(),
        }
    }
}

impl<D: Dom> ScrollLock<D> {
    pub fn new(dom: Rc<D>) -> Self {
        Self {
            dom,
            holders: Rc::new(Cell::new(0)),
        }
    }

    pub fn acquire(&self) -> ScrollLockGuard<D> {
        let holders = self.holders.get() + 1;
        self.holders.set(holders);
        if holders == 1 {
            debug!("scroll locked");
            self.apply("hidden");
        }
        ScrollLockGuard { lock: self.clone() }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    fn release(&self) {
        let holders = self.holders.get().saturating_sub(1);
        self.holders.set(holders);
        if holders == 0 {
            debug!("scroll unlocked");
            self.apply("");
        }
    }

    fn apply(&self, overflow: &str) {
        if let Some(body) = self.dom.body() {
            self.dom.set_style(&body, "overflow", overflow);
        }
    }
}

#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScrollLockGuard<D: Dom> {
    lock: ScrollLock<D>,
}

impl<D: Dom> Drop for ScrollLockGuard<D> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
