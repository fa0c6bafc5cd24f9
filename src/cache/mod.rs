//! The interning cache and its shared handles.
//!
//! [`InternCache`] owns a mapping from a derived key to a canonical,
//! immutable record. On lookup it either returns the existing record or
//! stores the caller's candidate as the new canonical instance; either way
//! the caller gets back an [`Intern`] handle, a cheap, read-only, shareable
//! view. Entries are never evicted and never mutated once stored.
//!
//! # Architecture
//!
//! ```text
//! caller ── get_or_create(candidate) ──▶ InternCache
//!                                          │  derive key (structural)
//!                                          │  probe map, insert if absent
//!                                          ▼
//!                                   Map<Key, Arc<Record>>
//!                                          │
//! caller ◀── Intern<Record> (shared) ──────┘
//! ```
//!
//! The probe-then-maybe-insert sequence is a single atomic step, so two
//! callers racing on the same key can never both insert: one mints the
//! canonical record, the other receives it.
//!
//! # Backends
//!
//! Uses either `DashMap` (lock-free, feature `dashmap-backend`) or
//! `RwLock<FxHashMap>` (fast hash, default) as the underlying map. The
//! observable semantics are identical.
//!
//! # Examples
//!
//! ```rust
//! use libintern::prelude::*;
//!
//! let cache = InternCache::new();
//!
//! let first = cache.get_or_create(
//!     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
//! );
//! let second = cache.get_or_create(
//!     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
//! );
//!
//! // Both handles view the same canonical record
//! assert!(Intern::shares_storage(&first, &second));
//! assert_eq!(cache.len(), 1);
//! ```

pub mod stats;

pub use stats::CacheStats;

use crate::record::{combine, Internable, RenderedView};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "dashmap-backend")]
use dashmap::DashMap;

#[cfg(not(feature = "dashmap-backend"))]
use rustc_hash::FxHashMap;
#[cfg(not(feature = "dashmap-backend"))]
use std::sync::RwLock;

/// A shared, read-only handle to a canonical record.
///
/// Handles are what the cache hands out: cloning one bumps a reference
/// count instead of cloning the record, and no handle can mutate the
/// canonical data. A handle may outlive the call that produced it (and even
/// the cache itself): the record stays alive as long as any handle does.
///
/// Equality and hashing go by record value, matching the cache's notion of
/// canonical identity. [`Intern::shares_storage`] additionally exposes
/// whether two handles view the same stored instance, which is useful for
/// verifying deduplication but is never what the cache keys on.
pub struct Intern<T> {
    record: Arc<T>,
}

impl<T> Intern<T> {
    fn new(record: Arc<T>) -> Self {
        Self { record }
    }

    /// True if both handles view the same stored instance.
    ///
    /// Two handles for equal-keyed requests against the same cache always
    /// share storage; handles from different caches never do, even when the
    /// record values are equal.
    pub fn shares_storage(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.record, &b.record)
    }

    /// Pairs this record with per-call unique state.
    ///
    /// Pure pass-through to [`combine`](crate::record::combine): no cache
    /// interaction, no failure modes, and the canonical record is untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libintern::prelude::*;
    ///
    /// let cache = InternCache::new();
    /// let record = cache.get_or_create(
    ///     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
    /// );
    /// let ctx = UniqueContext::new(["James Doe".into(), "CL234IR".into()]).unwrap();
    ///
    /// let view = record.combine(&ctx);
    /// assert_eq!(
    ///     view.to_string(),
    ///     "shared ([BMW, M5, red]) + unique ([James Doe, CL234IR])",
    /// );
    /// ```
    pub fn combine<U>(&self, unique: U) -> RenderedView<'_, T, U> {
        combine(&*self.record, unique)
    }
}

impl<T> Clone for Intern<T> {
    fn clone(&self) -> Self {
        Self {
            record: Arc::clone(&self.record),
        }
    }
}

impl<T> Deref for Intern<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.record
    }
}

impl<T: fmt::Debug> fmt::Debug for Intern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Intern").field(&self.record).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Intern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)
    }
}

impl<T: PartialEq> PartialEq for Intern<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.record == *other.record
    }
}

impl<T: Eq> Eq for Intern<T> {}

impl<T: std::hash::Hash> std::hash::Hash for Intern<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.record.hash(state);
    }
}

/// Thread-safe interning cache over any [`Internable`] record type.
///
/// The cache guarantees that logically identical shared state is
/// represented by exactly one stored record and serves that record on
/// demand. It is a leaf component: callers inject an instance where it is
/// needed; there is no process-wide global.
///
/// Cloning the cache is cheap: clones share the same storage and
/// statistics, so a clone can be handed to each worker thread.
///
/// # Thread Safety
///
/// All methods take `&self`. With the default backend, writes serialize on
/// an internal `RwLock` held across the whole probe-then-insert step; with
/// the `dashmap-backend` feature, probe-or-insert uses the map's atomic
/// entry API instead. In both configurations concurrent `get_or_create`
/// calls with the same key yield handles to a single canonical record.
///
/// # Examples
///
/// ```rust
/// use libintern::prelude::*;
///
/// let cache = InternCache::with_seeds([
///     SharedRecord::new(["Chevrolet".into(), "Camaro2018".into(), "pink".into()]).unwrap(),
///     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
/// ]);
///
/// assert_eq!(cache.len(), 2);
/// let bmw = cache.get_or_create(
///     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
/// );
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.stats().hits(), 1);
/// ```
pub struct InternCache<T: Internable> {
    #[cfg(feature = "dashmap-backend")]
    entries: Arc<DashMap<T::Key, Arc<T>>>,

    #[cfg(not(feature = "dashmap-backend"))]
    entries: Arc<RwLock<FxHashMap<T::Key, Arc<T>>>>,

    stats: Arc<CacheStats>,
}

impl<T: Internable> InternCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "dashmap-backend")]
            entries: Arc::new(DashMap::new()),

            #[cfg(not(feature = "dashmap-backend"))]
            entries: Arc::new(RwLock::new(FxHashMap::default())),

            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Creates a cache pre-populated with the given seed records.
    ///
    /// Each seed is stored under its derived key. If two seeds collide on
    /// key, the later one in the sequence wins (last-write-wins); duplicate
    /// seeds are a caller error, and this policy makes the outcome
    /// deterministic rather than guessing a merge. Seeding counts neither
    /// hits nor misses in [`stats`](Self::stats).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libintern::prelude::*;
    ///
    /// let cache = InternCache::with_seeds([
    ///     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
    ///     SharedRecord::new(["BMW".into(), "X6".into(), "white".into()]).unwrap(),
    ///     // same key as the first seed: replaces it
    ///     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
    /// ]);
    /// assert_eq!(cache.len(), 2);
    /// ```
    pub fn with_seeds<I>(seeds: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let cache = Self::new();

        #[cfg(feature = "dashmap-backend")]
        {
            for seed in seeds {
                cache.entries.insert(seed.intern_key(), Arc::new(seed));
            }
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            let mut entries = cache.entries.write().unwrap();
            for seed in seeds {
                entries.insert(seed.intern_key(), Arc::new(seed));
            }
            drop(entries);
        }

        cache
    }

    /// Returns the canonical record for the candidate's key, storing the
    /// candidate if the key is new.
    ///
    /// On a hit the stored record is served and the candidate is dropped:
    /// by the key-derivation contract its field values equal the stored
    /// ones. On a miss the candidate becomes the canonical record. After
    /// this call, every past and future equal-keyed request resolves to a
    /// field-equal record.
    ///
    /// The operation is total: well-formed candidates cannot fail, and the
    /// distinct-record count grows by at most one.
    ///
    /// # Thread Safety
    ///
    /// Probe and insert happen as one atomic step; concurrent callers with
    /// the same key always end up sharing a single canonical record.
    ///
    /// # Panics
    ///
    /// With the default backend, panics if the internal lock is poisoned
    /// (another thread panicked while holding it).
    pub fn get_or_create(&self, candidate: T) -> Intern<T> {
        let key = candidate.intern_key();

        #[cfg(feature = "dashmap-backend")]
        {
            use dashmap::mapref::entry::Entry;

            match self.entries.entry(key) {
                Entry::Occupied(slot) => {
                    self.stats.record_hit();
                    Intern::new(Arc::clone(slot.get()))
                }
                Entry::Vacant(slot) => {
                    self.stats.record_miss();
                    Intern::new(Arc::clone(slot.insert(Arc::new(candidate)).value()))
                }
            }
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            use std::collections::hash_map::Entry;

            let mut entries = self.entries.write().unwrap();
            match entries.entry(key) {
                Entry::Occupied(slot) => {
                    self.stats.record_hit();
                    Intern::new(Arc::clone(slot.get()))
                }
                Entry::Vacant(slot) => {
                    self.stats.record_miss();
                    Intern::new(Arc::clone(slot.insert(Arc::new(candidate))))
                }
            }
        }
    }

    /// Looks up the canonical record for a key without inserting.
    ///
    /// Non-inserting probes do not touch [`stats`](Self::stats).
    ///
    /// # Panics
    ///
    /// With the default backend, panics if the internal lock is poisoned.
    pub fn get(&self, key: &T::Key) -> Option<Intern<T>> {
        #[cfg(feature = "dashmap-backend")]
        {
            self.entries
                .get(key)
                .map(|slot| Intern::new(Arc::clone(slot.value())))
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            self.entries
                .read()
                .unwrap()
                .get(key)
                .map(|record| Intern::new(Arc::clone(record)))
        }
    }

    /// True if a canonical record is stored under the key.
    pub fn contains_key(&self, key: &T::Key) -> bool {
        #[cfg(feature = "dashmap-backend")]
        {
            self.entries.contains_key(key)
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            self.entries.read().unwrap().contains_key(key)
        }
    }

    /// Number of distinct stored records.
    ///
    /// Equals the number of distinct keys ever seeded or interned;
    /// monotonically non-decreasing, changing by at most one per
    /// [`get_or_create`](Self::get_or_create) call.
    pub fn len(&self) -> usize {
        #[cfg(feature = "dashmap-backend")]
        {
            self.entries.len()
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            self.entries.read().unwrap().len()
        }
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all stored keys, in no particular order.
    pub fn keys(&self) -> Vec<T::Key> {
        #[cfg(feature = "dashmap-backend")]
        {
            self.entries.iter().map(|slot| slot.key().clone()).collect()
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            self.entries.read().unwrap().keys().cloned().collect()
        }
    }

    /// Snapshot of handles to all stored records, in no particular order.
    pub fn records(&self) -> Vec<Intern<T>> {
        #[cfg(feature = "dashmap-backend")]
        {
            self.entries
                .iter()
                .map(|slot| Intern::new(Arc::clone(slot.value())))
                .collect()
        }

        #[cfg(not(feature = "dashmap-backend"))]
        {
            self.entries
                .read()
                .unwrap()
                .values()
                .map(|record| Intern::new(Arc::clone(record)))
                .collect()
        }
    }

    /// Hit/miss counters for [`get_or_create`](Self::get_or_create) calls.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<T: Internable> Clone for InternCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T: Internable> Default for InternCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Internable> fmt::Debug for InternCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternCache")
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SharedRecord;

    fn car(brand: &str, model: &str, color: &str) -> SharedRecord {
        SharedRecord::new([brand.into(), model.into(), color.into()]).unwrap()
    }

    #[test]
    fn test_get_or_create_miss_then_hit() {
        let cache = InternCache::new();

        let first = cache.get_or_create(car("BMW", "M5", "red"));
        assert_eq!(cache.len(), 1);

        let second = cache.get_or_create(car("BMW", "M5", "red"));
        assert_eq!(cache.len(), 1);

        assert_eq!(first, second);
        assert!(Intern::shares_storage(&first, &second));
    }

    #[test]
    fn test_distinct_keys_distinct_records() {
        let cache = InternCache::new();

        let m5 = cache.get_or_create(car("BMW", "M5", "red"));
        let x1 = cache.get_or_create(car("BMW", "X1", "red"));

        assert_eq!(cache.len(), 2);
        assert_ne!(m5, x1);
        assert!(!Intern::shares_storage(&m5, &x1));
    }

    #[test]
    fn test_seed_last_write_wins() {
        let cache = InternCache::with_seeds([
            car("BMW", "M5", "red"),
            car("Chevrolet", "Camaro2018", "pink"),
            car("BMW", "M5", "red"),
        ]);

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_seeded_records_are_served() {
        let cache = InternCache::with_seeds([car("BMW", "M5", "red")]);

        let served = cache.get_or_create(car("BMW", "M5", "red"));
        assert_eq!(cache.len(), 1);
        assert_eq!(served.fields()[1].as_text(), Some("M5"));
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
    }

    #[test]
    fn test_get_and_contains_key() {
        let cache = InternCache::new();
        let record = car("BMW", "X6", "white");
        let key = record.intern_key();

        assert!(cache.get(&key).is_none());
        assert!(!cache.contains_key(&key));

        let stored = cache.get_or_create(record);
        let probed = cache.get(&key).unwrap();
        assert!(Intern::shares_storage(&stored, &probed));
        assert!(cache.contains_key(&key));

        // Probes never insert or touch stats
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_keys_and_records_snapshots() {
        let cache = InternCache::with_seeds([
            car("BMW", "M5", "red"),
            car("Mercedes Benz", "C300", "black"),
        ]);

        let mut keys: Vec<String> = cache.keys().iter().map(|k| k.to_string()).collect();
        keys.sort();
        assert_eq!(keys, ["BMW_M5_red", "Mercedes Benz_C300_black"]);

        assert_eq!(cache.records().len(), 2);
    }

    #[test]
    fn test_stats_track_outcomes() {
        let cache = InternCache::new();

        cache.get_or_create(car("BMW", "M5", "red")); // miss
        cache.get_or_create(car("BMW", "M5", "red")); // hit
        cache.get_or_create(car("BMW", "X1", "red")); // miss

        assert_eq!(cache.stats().misses(), 2);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().lookups(), 3);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = InternCache::new();
        let clone = cache.clone();

        let original = cache.get_or_create(car("BMW", "M5", "red"));
        let via_clone = clone.get_or_create(car("BMW", "M5", "red"));

        assert!(Intern::shares_storage(&original, &via_clone));
        assert_eq!(clone.len(), 1);
        assert_eq!(clone.stats().hits(), 1);
    }

    #[test]
    fn test_handle_outlives_cache() {
        let handle = {
            let cache = InternCache::new();
            cache.get_or_create(car("BMW", "M5", "red"))
        };

        assert_eq!(handle.to_string(), "[BMW, M5, red]");
    }

    #[test]
    fn test_handle_equality_is_by_value() {
        let left = InternCache::new().get_or_create(car("BMW", "M5", "red"));
        let right = InternCache::new().get_or_create(car("BMW", "M5", "red"));

        // Different caches, equal record values
        assert_eq!(left, right);
        assert!(!Intern::shares_storage(&left, &right));
    }
}
