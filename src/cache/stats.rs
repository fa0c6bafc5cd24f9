//! Hit/miss accounting for the interning cache.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic hit/miss counters for [`InternCache`](crate::cache::InternCache).
///
/// A **hit** means `get_or_create` served an already-stored canonical
/// record; a **miss** means it minted a new one. Seeding at construction
/// and non-inserting probes (`get`, `contains_key`) count neither.
///
/// Counters are updated with relaxed atomics: they order nothing, they only
/// count. Reading them mid-race may observe either side of an in-flight
/// update, which is fine for metrics.
///
/// # Examples
///
/// ```rust
/// use libintern::prelude::*;
///
/// let cache = InternCache::new();
/// cache.get_or_create(SharedRecord::new(["BMW".into(), "M5".into()]).unwrap());
/// cache.get_or_create(SharedRecord::new(["BMW".into(), "M5".into()]).unwrap());
///
/// assert_eq!(cache.stats().misses(), 1);
/// assert_eq!(cache.stats().hits(), 1);
/// assert_eq!(cache.stats().lookups(), 2);
/// ```
#[derive(Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of `get_or_create` calls that served an existing record.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of `get_or_create` calls that minted a new record.
    ///
    /// Always equals the number of distinct keys interned after
    /// construction, since a key misses exactly once.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Total `get_or_create` calls observed.
    pub fn lookups(&self) -> u64 {
        self.hits() + self.misses()
    }
}

impl fmt::Debug for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStats")
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
