//! Browser capabilities besides the document itself. Each one is a trait with
//! a real implementation and a fallback, chosen once when the page mounts.

use std::rc::Rc;

use crate::subscription::Subscription;

#[cfg(any(test, feature = "headless"))]
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Persistent string key/value storage (local storage in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

pub trait Scheduler {
    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription;
    fn interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Subscription;
}

/// Reports each watched node once, the first time it is sufficiently
/// visible, and stops watching it afterwards.
pub trait VisibilityWatcher<N> {
    fn watch(&self, nodes: Vec<N>, on_visible: Box<dyn FnMut(&N)>) -> Subscription;
}

/// Third-party icon library that swaps placeholder markup for icons.
pub trait IconLibrary {
    fn create_icons(&self);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Fallback when the browser cannot observe visibility: everything counts as
/// visible straight away.
pub struct RevealImmediately;

impl<N> VisibilityWatcher<N> for RevealImmediately {
    fn watch(&self, nodes: Vec<N>, mut on_visible: Box<dyn FnMut(&N)>) -> Subscription {
        for node in &nodes {
            on_visible(node);
        }
        Subscription::noop()
    }
}

pub struct NoIcons;

impl IconLibrary for NoIcons {
    fn create_icons(&self) {}
}

/// Capability bundle handed to every behavior module.
pub struct Platform<N> {
    pub clock: Rc<dyn Clock>,
    pub store: Rc<dyn KeyValueStore>,
    pub scheduler: Rc<dyn Scheduler>,
    pub visibility: Rc<dyn VisibilityWatcher<N>>,
    pub icons: Rc<dyn IconLibrary>,
}

impl<N> Clone for Platform<N> {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            store: self.store.clone(),
            scheduler: self.scheduler.clone(),
            visibility: self.visibility.clone(),
            icons: self.icons.clone(),
        }
    }
}
