//! Timestamp records in persistent storage, valid for a fixed window.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{Clock, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampRecord {
    /// Epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Error)]
pub enum StampError {
    #[error("stored record under {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringStamp {
    key: String,
    window_ms: i64,
}

impl ExpiringStamp {
    pub fn new(key: impl Into<String>, window_ms: i64) -> Self {
        Self {
            key: key.into(),
            window_ms,
        }
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> Result<Option<StampRecord>, StampError> {
        let Some(raw) = store.get(&self.key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StampError::Corrupt {
                key: self.key.clone(),
                source,
            })
    }

    /// Whether a record exists and is younger than the window. A record
    /// exactly one window old is expired; a corrupt one, or one too far from
    /// now to measure, counts as absent.
    pub fn is_fresh(&self, store: &dyn KeyValueStore, clock: &dyn Clock) -> bool {
        match self.load(store) {
            Ok(Some(record)) => clock
                .now_ms()
                .checked_sub(record.timestamp)
                .map_or(false, |age| age < self.window_ms),
            Ok(None) => false,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    pub fn stamp(&self, store: &dyn KeyValueStore, clock: &dyn Clock) {
        let record = StampRecord {
            timestamp: clock.now_ms(),
        };
        match serde_json::to_string(&record) {
            Ok(raw) => store.set(&self.key, &raw),
            Err(e) => warn!("failed to encode {}: {}", self.key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{ManualClock, MemoryStore};
    use pretty_assertions::assert_eq;

    const WINDOW: i64 = 30 * 24 * 60 * 60 * 1000;

    #[test]
    fn freshness_uses_strict_less_than() {
        let store = MemoryStore::default();
        let clock = ManualClock::at(1_000);
        let stamp = ExpiringStamp::new("consent", WINDOW);
        stamp.stamp(&store, &clock);

        clock.set(1_000 + WINDOW - 1);
        assert!(stamp.is_fresh(&store, &clock));
        clock.set(1_000 + WINDOW);
        assert!(!stamp.is_fresh(&store, &clock));
    }

    #[test]
    fn stored_layout_is_a_timestamp_object() {
        let store = MemoryStore::default();
        let clock = ManualClock::at(1_700_000_000_000);
        ExpiringStamp::new("k", WINDOW).stamp(&store, &clock);
        assert_eq!(store.get("k").as_deref(), Some(r#"{"timestamp":1700000000000}"#));
    }

    #[test]
    fn corrupt_record_counts_as_absent() {
        let store = MemoryStore::default();
        store.set("k", "not json");
        let stamp = ExpiringStamp::new("k", WINDOW);
        assert!(matches!(stamp.load(&store), Err(StampError::Corrupt { .. })));
        assert!(!stamp.is_fresh(&store, &ManualClock::at(0)));
    }

    #[test]
    fn out_of_range_timestamp_counts_as_absent() {
        let store = MemoryStore::default();
        let clock = ManualClock::at(1_700_000_000_000);
        let stamp = ExpiringStamp::new("k", WINDOW);

        store.set("k", &format!(r#"{{"timestamp":{}}}"#, i64::MIN));
        assert!(!stamp.is_fresh(&store, &clock));
        store.set("k", &format!(r#"{{"timestamp":{}}}"#, i64::MAX));
        clock.set(i64::MIN);
        assert!(!stamp.is_fresh(&store, &clock));
    }

    #[test]
    fn missing_record_is_not_fresh() {
        let stamp = ExpiringStamp::new("k", WINDOW);
        assert!(!stamp.is_fresh(&MemoryStore::default(), &ManualClock::at(0)));
    }
}
