use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Function, Reflect};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::{
    IconLibrary, KeyValueStore, NoIcons, Platform, RevealImmediately, Scheduler, SystemClock,
    VisibilityWatcher,
};
use crate::config::SiteConfig;
use crate::subscription::Subscription;

/// `window.localStorage`, or nothing when the browser refuses access.
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            warn!("local storage unavailable, records will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                warn!("failed to store {}: {:?}", key, e);
            }
        }
    }
}

pub struct BrowserTimers;

impl Scheduler for BrowserTimers {
    fn timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Subscription {
        let timeout = Timeout::new(millis, callback);
        Subscription::new(move || drop(timeout))
    }

    fn interval(&self, millis: u32, mut callback: Box<dyn FnMut()>) -> Subscription {
        let interval = Interval::new(millis, move || callback());
        Subscription::new(move || drop(interval))
    }
}

/// Viewport visibility through `IntersectionObserver`.
pub struct IntersectionWatcher {
    threshold: f64,
    root_margin: String,
}

impl IntersectionWatcher {
    /// `None` when the browser has no `IntersectionObserver`.
    pub fn detect(config: &SiteConfig) -> Option<Self> {
        let window = web_sys::window()?;
        let supported = Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        supported.then(|| Self {
            threshold: config.reveal_threshold,
            root_margin: config.reveal_root_margin.clone(),
        })
    }
}

impl VisibilityWatcher<Element> for IntersectionWatcher {
    fn watch(&self, nodes: Vec<Element>, on_visible: Box<dyn FnMut(&Element)>) -> Subscription {
        let on_visible = Rc::new(RefCell::new(on_visible));

        let report = on_visible.clone();
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    (*report.borrow_mut())(&target);
                    observer.unobserve(&target);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(self.threshold));
        options.set_root_margin(&self.root_margin);

        let observer = match IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(observer) => observer,
            Err(e) => {
                warn!("IntersectionObserver construction failed: {:?}", e);
                return RevealImmediately.watch(
                    nodes,
                    Box::new(move |node: &Element| (*on_visible.borrow_mut())(node)),
                );
            }
        };
        for node in &nodes {
            observer.observe(node);
        }

        Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        })
    }
}

/// The global `lucide` icon library.
pub struct LucideIcons {
    create_icons: Function,
    library: JsValue,
}

impl LucideIcons {
    pub fn detect() -> Option<Self> {
        let global = web_sys::js_sys::global();
        let library = Reflect::get(&global, &JsValue::from_str("lucide")).ok()?;
        if library.is_undefined() || library.is_null() {
            return None;
        }
        let create_icons = Reflect::get(&library, &JsValue::from_str("createIcons"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { create_icons, library })
    }
}

impl IconLibrary for LucideIcons {
    fn create_icons(&self) {
        if let Err(e) = self.create_icons.call0(&self.library) {
            warn!("lucide.createIcons failed: {:?}", e);
        }
    }
}

/// Real browser capabilities, with fallbacks picked for whatever is missing.
pub fn platform(config: &SiteConfig) -> Platform<Element> {
    let visibility: Rc<dyn VisibilityWatcher<Element>> = match IntersectionWatcher::detect(config) {
        Some(watcher) => Rc::new(watcher),
        None => {
            debug!("no IntersectionObserver, revealing elements immediately");
            Rc::new(RevealImmediately)
        }
    };
    let icons: Rc<dyn IconLibrary> = match LucideIcons::detect() {
        Some(lucide) => Rc::new(lucide),
        None => {
            debug!("lucide not loaded, icon placeholders stay as-is");
            Rc::new(NoIcons)
        }
    };
    Platform {
        clock: Rc::new(SystemClock),
        store: Rc::new(LocalStore::new()),
        scheduler: Rc::new(BrowserTimers),
        visibility,
        icons,
    }
}
