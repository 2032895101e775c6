//! Deterministic capabilities for headless runs: a hand-driven clock and
//! timer queue, an in-memory store, and a visibility watcher the caller
//! triggers explicitly.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{Clock, IconLibrary, KeyValueStore, Platform, Scheduler, VisibilityWatcher};
use crate::subscription::Subscription;

#[derive(Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self { now: Cell::new(now_ms) }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Every(u32, Box<dyn FnMut()>),
}

struct Timer {
    id: u64,
    due: u64,
    task: Task,
}

/// Timer queue advanced by hand with [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    elapsed: Cell<u64>,
    next_id: Cell<u64>,
    timers: Rc<RefCell<Vec<Timer>>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move time forward, firing due timers in deadline order.
    pub fn advance(&self, millis: u64) {
        let deadline = self.elapsed.get() + millis;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let earliest = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= deadline)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                earliest.map(|i| timers.remove(i))
            };
            let Some(timer) = next else { break };
            self.elapsed.set(timer.due);
            match timer.task {
                Task::Once(callback) => callback(),
                Task::Every(period, mut callback) => {
                    callback();
                    self.timers.borrow_mut().push(Timer {
                        id: timer.id,
                        due: timer.due + u64::from(period.max(1)),
                        task: Task::Every(period, callback),
                    });
                }
            }
        }
        self.elapsed.set(deadline);
    }

    fn schedule(&self, delay: u32, task: Task) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.timers.borrow_mut().push(Timer {
            id,
            due: self.elapsed.get() + u64::from(delay),
            task,
        });
        let timers = Rc::downgrade(&self.timers);
        Subscription::new(move || {
            if let Some(timers) = timers.upgrade() {
                let removed: Vec<Timer> = {
                    let mut list = timers.borrow_mut();
                    let (gone, kept): (Vec<Timer>, Vec<Timer>) =
                        list.drain(..).partition(|t| t.id == id);
                    *list = kept;
                    gone
                };
                drop(removed);
            }
        })
    }
}

impl Scheduler for ManualScheduler {
    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription {
        self.schedule(millis, Task::Once(callback))
    }

    fn interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Subscription {
        self.schedule(millis, Task::Every(millis, callback))
    }
}

struct Watch<N> {
    nodes: Vec<N>,
    on_visible: Box<dyn FnMut(&N)>,
}

/// Visibility watcher whose intersections are triggered by the caller.
pub struct ManualVisibility<N> {
    watches: RefCell<Vec<Watch<N>>>,
}

impl<N> Default for ManualVisibility<N> {
    fn default() -> Self {
        Self {
            watches: RefCell::new(Vec::new()),
        }
    }
}

impl<N: PartialEq> ManualVisibility<N> {
    pub fn watched(&self) -> usize {
        self.watches.borrow().iter().map(|w| w.nodes.len()).sum()
    }

    /// Report `node` as intersecting; watchers forget it afterwards.
    pub fn show(&self, node: &N) {
        let mut watches = self.watches.borrow_mut();
        for watch in watches.iter_mut() {
            if let Some(index) = watch.nodes.iter().position(|n| n == node) {
                let node = watch.nodes.remove(index);
                (watch.on_visible)(&node);
            }
        }
    }
}

impl<N: 'static> VisibilityWatcher<N> for ManualVisibility<N> {
    fn watch(&self, nodes: Vec<N>, on_visible: Box<dyn FnMut(&N)>) -> Subscription {
        self.watches.borrow_mut().push(Watch { nodes, on_visible });
        Subscription::noop()
    }
}

#[derive(Default)]
pub struct CountingIcons {
    calls: Cell<usize>,
}

impl CountingIcons {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl IconLibrary for CountingIcons {
    fn create_icons(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// Handles to every manual capability, kept by tests to drive and inspect them.
pub struct Harness<N> {
    pub clock: Rc<ManualClock>,
    pub store: Rc<MemoryStore>,
    pub scheduler: Rc<ManualScheduler>,
    pub visibility: Rc<ManualVisibility<N>>,
    pub icons: Rc<CountingIcons>,
}

impl<N: PartialEq + 'static> Harness<N> {
    pub fn new(now_ms: i64) -> Self {
        Self {
            clock: Rc::new(ManualClock::at(now_ms)),
            store: Rc::new(MemoryStore::default()),
            scheduler: Rc::new(ManualScheduler::default()),
            visibility: Rc::new(ManualVisibility::default()),
            icons: Rc::new(CountingIcons::default()),
        }
    }

    pub fn platform(&self) -> Platform<N> {
        Platform {
            clock: self.clock.clone(),
            store: self.store.clone(),
            scheduler: self.scheduler.clone(),
            visibility: self.visibility.clone(),
            icons: self.icons.clone(),
        }
    }
}
