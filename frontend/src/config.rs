use chrono::TimeDelta;
use log::{warn, Level};
use serde::Deserialize;

use crate::dom::Dom;

/// Id of the optional `<script type="application/json">` block that
/// overrides any subset of [`SiteConfig`].
pub const CONFIG_ELEMENT_ID: &str = "site-config";

const DEFAULT_CONSENT_DAYS: i64 = 30;
const DEFAULT_EXIT_HOURS: i64 = 24;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub consent_storage_key: String,
    pub consent_expiry_days: i64,
    pub exit_storage_key: String,
    pub exit_cooldown_hours: i64,
    /// Pointer must leave above this many pixels from the top edge.
    pub exit_edge_px: f64,
    /// Body class that marks the page where the exit popup may appear.
    pub home_page_class: String,
    pub header_scroll_threshold: f64,
    pub carousel_autoplay_ms: u32,
    pub submit_delay_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            consent_storage_key: "dmajumdar_disclaimer_accepted".to_string(),
            consent_expiry_days: DEFAULT_CONSENT_DAYS,
            exit_storage_key: "dmajumdar_exit_popup_shown".to_string(),
            exit_cooldown_hours: DEFAULT_EXIT_HOURS,
            exit_edge_px: 10.0,
            home_page_class: "page-home".to_string(),
            header_scroll_threshold: 50.0,
            carousel_autoplay_ms: 5000,
            submit_delay_ms: 1000,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

impl SiteConfig {
    /// Defaults, overlaid with the page's `#site-config` JSON when present.
    pub fn from_document<D: Dom>(dom: &D) -> Self {
        let Some(node) = dom.element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        Self::from_json(&dom.text(&node))
    }

    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    /// Out-of-range overrides fall back to the default window.
    pub fn consent_window_ms(&self) -> i64 {
        TimeDelta::try_days(self.consent_expiry_days)
            .unwrap_or_else(|| {
                warn!("consentExpiryDays {} out of range", self.consent_expiry_days);
                TimeDelta::days(DEFAULT_CONSENT_DAYS)
            })
            .num_milliseconds()
    }

    pub fn exit_window_ms(&self) -> i64 {
        TimeDelta::try_hours(self.exit_cooldown_hours)
            .unwrap_or_else(|| {
                warn!("exitCooldownHours {} out of range", self.exit_cooldown_hours);
                TimeDelta::hours(DEFAULT_EXIT_HOURS)
            })
            .num_milliseconds()
    }
}
