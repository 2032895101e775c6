//! Progressive enhancement for the firm's static pages: disclaimer gate,
//! navigation, form validation, testimonials carousel, exit popup and
//! scroll animations, all attached to server-rendered markup.

pub mod anchors;
pub mod carousel;
pub mod config;
pub mod consent;
pub mod dom;
pub mod exit_intent;
pub mod forms;
pub mod header;
pub mod icons;
pub mod locale;
pub mod nav;
pub mod page;
pub mod platform;
pub mod reveal;
pub mod scroll_lock;
pub mod stamp;
pub mod subscription;

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::{info, warn};
    use wasm_bindgen::prelude::*;

    use crate::config::{self, SiteConfig};
    use crate::dom::web::WebDom;
    use crate::dom::{Dom, Event, EventKind, Target};
    use crate::page::Page;
    use crate::platform;
    use crate::subscription::Subscription;

    thread_local! {
        static PAGE: RefCell<Option<Page<WebDom>>> = RefCell::new(None);
        static PENDING: RefCell<Option<Subscription>> = RefCell::new(None);
    }

    fn mount(dom: Rc<WebDom>) {
        let config = SiteConfig::from_document(&*dom);
        let page = Page::mount(dom, platform::web::platform(&config), &config);
        PAGE.with(|slot| *slot.borrow_mut() = Some(page));
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(config::log_level()).is_err() {
            warn!("logger already initialized");
        }

        let Some(dom) = WebDom::new().map(Rc::new) else {
            return;
        };
        info!("starting site scripts");

        if dom.is_loading() {
            let d = dom.clone();
            let ready = dom.listen(
                Target::Document,
                EventKind::DomContentLoaded,
                Box::new(move |_: &Event<web_sys::Element>| mount(d.clone())),
            );
            // Must not be dropped from inside its own callback; teardown releases it.
            PENDING.with(|slot| *slot.borrow_mut() = Some(ready));
        } else {
            mount(dom);
        }
    }

    /// Detach every listener and cancel every timer on the page.
    #[wasm_bindgen]
    pub fn teardown() {
        PAGE.with(|slot| slot.borrow_mut().take());
        PENDING.with(|slot| slot.borrow_mut().take());
        info!("site scripts torn down");
    }
}
