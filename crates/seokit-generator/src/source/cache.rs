//! Time-boxed in-memory cache.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};

use super::clock::Clock;

#[derive(Debug)]
struct Entry<V> {
    stored_at: DateTime<Utc>,
    value: V,
}

/// Key/value cache whose entries expire `ttl` after they were stored.
///
/// Expiry is measured with the injected [`Clock`]. Concurrent writers to the
/// same key overwrite each other; the last one wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<V>>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The value for `key` if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;
        (now - entry.stored_at < self.ttl).then(|| entry.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let entry = Entry {
            stored_at: self.clock.now(),
            value,
        };
        self.lock().insert(key.into(), entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::source::clock::ManualClock;

    fn setup() -> (Arc<ManualClock>, TtlCache<Vec<u32>>) {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = TtlCache::new(Duration::minutes(5), clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_hit_within_ttl() {
        let (clock, cache) = setup();
        cache.insert("all_published", vec![1, 2, 3]);

        clock.advance(Duration::minutes(4));
        assert_eq!(cache.get("all_published"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_expires_at_ttl() {
        let (clock, cache) = setup();
        cache.insert("all_published", vec![1]);

        clock.advance(Duration::minutes(5));
        assert_eq!(cache.get("all_published"), None);
    }

    #[test]
    fn test_last_writer_wins_and_refreshes() {
        let (clock, cache) = setup();
        cache.insert("k", vec![1]);
        clock.advance(Duration::minutes(3));
        cache.insert("k", vec![2]);
        clock.advance(Duration::minutes(3));
        assert_eq!(cache.get("k"), Some(vec![2]));
    }

    #[test]
    fn test_clear_drops_every_key() {
        let (_clock, cache) = setup();
        cache.insert("a", vec![1]);
        cache.insert("b", vec![2]);

        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }
}
