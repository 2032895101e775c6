//! Composition root: builds every behavior module for the current document.

use std::rc::Rc;

use log::info;

use crate::anchors::AnchorScroller;
use crate::carousel::Carousel;
use crate::config::SiteConfig;
use crate::consent::ConsentGate;
use crate::dom::Dom;
use crate::exit_intent::ExitIntentPrompt;
use crate::forms::submission::SubmissionHandler;
use crate::forms::FormEnhancer;
use crate::header::ScrollHeader;
use crate::icons::IconRenderer;
use crate::locale::LocaleSwitch;
use crate::nav::NavigationController;
use crate::platform::Platform;
use crate::reveal::RevealOnScroll;
use crate::scroll_lock::ScrollLock;
use crate::stamp::ExpiringStamp;

/// Everything mounted on one page. Dropping it detaches every listener and
/// cancels every pending timer.
pub struct Page<D: Dom> {
    pub consent: Option<ConsentGate<D>>,
    pub nav: Option<NavigationController<D>>,
    pub header: Option<ScrollHeader<D>>,
    pub anchors: Option<AnchorScroller>,
    pub icons: IconRenderer,
    pub locale: Option<LocaleSwitch<D>>,
    pub exit_intent: Option<ExitIntentPrompt<D>>,
    pub carousel: Option<Carousel<D>>,
    pub reveal: Option<RevealOnScroll>,
    pub forms: Option<FormEnhancer<D>>,
    lock: ScrollLock<D>,
}

impl<D: Dom> Page<D> {
    pub fn mount(dom: Rc<D>, platform: Platform<D::Node>, config: &SiteConfig) -> Self {
        let lock = ScrollLock::new(dom.clone());

        let consent = ConsentGate::mount(
            dom.clone(),
            platform.clone(),
            &lock,
            ExpiringStamp::new(config.consent_storage_key.clone(), config.consent_window_ms()),
        );
        let nav = NavigationController::mount(dom.clone(), &lock);
        let header = ScrollHeader::mount(dom.clone(), config.header_scroll_threshold);
        let anchors = AnchorScroller::mount(dom.clone());
        let icons = IconRenderer::mount(platform.icons.clone());
        let locale = LocaleSwitch::mount(dom.clone());
        let exit_intent = ExitIntentPrompt::mount(
            dom.clone(),
            platform.clone(),
            &lock,
            ExpiringStamp::new(config.exit_storage_key.clone(), config.exit_window_ms()),
            &config.home_page_class,
            config.exit_edge_px,
        );
        let carousel = Carousel::mount(
            dom.clone(),
            platform.scheduler.clone(),
            config.carousel_autoplay_ms,
        );
        let reveal = RevealOnScroll::mount(dom.clone(), platform.visibility.clone());
        let submissions = SubmissionHandler::new(
            dom.clone(),
            platform.scheduler.clone(),
            icons.clone(),
            config.submit_delay_ms,
        );
        let forms = FormEnhancer::mount(dom, submissions);

        let page = Self {
            consent,
            nav,
            header,
            anchors,
            icons,
            locale,
            exit_intent,
            carousel,
            reveal,
            forms,
            lock,
        };
        info!("page ready: {}", page.summary());
        page
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Names of the modules that found their markup.
    pub fn active_modules(&self) -> Vec<&'static str> {
        [
            ("consent", self.consent.is_some()),
            ("nav", self.nav.is_some()),
            ("header", self.header.is_some()),
            ("anchors", self.anchors.is_some()),
            ("locale", self.locale.is_some()),
            ("exit-intent", self.exit_intent.is_some()),
            ("carousel", self.carousel.is_some()),
            ("reveal", self.reveal.is_some()),
            ("forms", self.forms.is_some()),
        ]
        .into_iter()
        .filter(|(_, active)| *active)
        .map(|(name, _)| name)
        .collect()
    }

    fn summary(&self) -> String {
        let active = self.active_modules();
        if active.is_empty() {
            "no enhancements".to_string()
        } else {
            active.join(", ")
        }
    }
}
