//! Cache snapshot serialization support.
//!
//! This module serializes the seed data of an [`InternCache`]: the
//! canonical records themselves, so a cache can be snapshotted for
//! inspection and rebuilt later. The snapshot is a convenience over
//! `Read`/`Write` streams, not a stable on-disk schema.
//!
//! # Example
//!
//! ```rust
//! use libintern::prelude::*;
//!
//! let cache = InternCache::with_seeds([
//!     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
//! ]);
//!
//! let mut buf = Vec::new();
//! JsonSerializer::serialize(&cache, &mut buf).unwrap();
//!
//! let rebuilt: InternCache<SharedRecord> =
//!     JsonSerializer::deserialize(buf.as_slice()).unwrap();
//! assert_eq!(rebuilt.len(), 1);
//! ```

use crate::cache::InternCache;
use crate::record::Internable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

mod json_impl;

pub use self::json_impl::JsonSerializer;

/// Trait for serializing and deserializing cache snapshots.
pub trait CacheSerializer {
    /// Serialize a cache's canonical records to a writer.
    ///
    /// Records are written in sorted-key order, so equal caches produce
    /// byte-identical snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or writing fails.
    fn serialize<T, W>(cache: &InternCache<T>, writer: W) -> Result<(), SerializationError>
    where
        T: Internable + Serialize,
        T::Key: Ord,
        W: Write;

    /// Deserialize a cache from a reader.
    ///
    /// The records are replayed through
    /// [`InternCache::with_seeds`](crate::cache::InternCache::with_seeds),
    /// so duplicate-keyed snapshot data collapses last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or reading fails.
    fn deserialize<T, R>(reader: R) -> Result<InternCache<T>, SerializationError>
    where
        T: Internable + DeserializeOwned,
        R: Read;
}

/// Errors that can occur during snapshot serialization/deserialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// Error during JSON serialization
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

/// Helper to extract all canonical records from a cache in sorted-key order.
fn extract_records<T>(cache: &InternCache<T>) -> Vec<T>
where
    T: Internable,
    T::Key: Ord,
{
    let mut records: Vec<T> = cache
        .records()
        .iter()
        .map(|handle| (**handle).clone())
        .collect();
    records.sort_by(|a, b| a.intern_key().cmp(&b.intern_key()));
    records
}
