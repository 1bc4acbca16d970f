use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::time::Instant;

use crate::{error::LookupError, model::WeatherReport};

type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

/// In-memory, process-lifetime memo of successful lookups.
///
/// Each key has its own slot. A caller holds the slot while it fetches, so a
/// concurrent caller for the same key waits and then reads the stored report
/// instead of going upstream a second time.
#[derive(Debug)]
pub struct ReportCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    report: WeatherReport,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slots: Mutex::new(HashMap::new()) }
    }

    /// Return the fresh report for `key`, or run `fetch` and store its success.
    ///
    /// Failures are handed back without being stored.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<WeatherReport, LookupError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<WeatherReport, LookupError>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref().filter(|e| e.is_fresh(self.ttl)) {
            tracing::debug!(key, "serving cached report");
            return Ok(cached.report.clone());
        }

        let result = fetch().await;
        *entry = match &result {
            Ok(report) => Some(CacheEntry { stored_at: Instant::now(), report: report.clone() }),
            Err(_) => None,
        };
        result
    }

    /// The slot for `key`, dropping idle slots whose entry has expired.
    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.lock();
        let ttl = self.ttl;

        // A slot some caller still holds (waiting or fetching) must stay.
        slots.retain(|_, slot| {
            Arc::strong_count(slot) > 1
                || slot.try_lock().map_or(true, |entry| {
                    entry.as_ref().is_some_and(|e| e.is_fresh(ttl))
                })
        });

        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    // A poisoned lock only means another caller panicked while pruning; the map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
