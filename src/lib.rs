//! # libintern
//!
//! Shared-state interning cache for Rust.
//!
//! Many logical entities often share an identical chunk of immutable state:
//! thousands of particles drawing from a handful of sprites, a fleet of cars
//! described by a few dozen make/model/color combinations. This crate
//! deduplicates that shared state behind a structural composite key and hands
//! out cheap, read-only handles, so the heavy data is stored exactly once
//! no matter how many entities reference it.
//!
//! ## Example
//!
//! ```rust
//! use libintern::prelude::*;
//!
//! let cache = InternCache::with_seeds([
//!     SharedRecord::new(["Chevrolet".into(), "Camaro2018".into(), "pink".into()]).unwrap(),
//!     SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap(),
//! ]);
//! assert_eq!(cache.len(), 2);
//!
//! // An equal-keyed candidate resolves to the already-stored record.
//! let candidate = SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap();
//! let canonical = cache.get_or_create(candidate);
//! assert_eq!(cache.len(), 2);
//!
//! // Per-call state is paired with the canonical record at the point of use,
//! // never stored in the cache.
//! let ctx = UniqueContext::new(["James Doe".into(), "CL234IR".into()]).unwrap();
//! println!("{}", canonical.combine(&ctx));
//! ```
//!
//! ## Design
//!
//! - **Structural keys**: canonical identity is the ordered field tuple
//!   itself, not a hash digest, so distinct records can never collide.
//! - **Shared handles**: callers receive [`Intern<T>`](cache::Intern), a
//!   reference-counted read-only view. Cloning a handle never clones the
//!   record.
//! - **Thread-safe by default**: probe-then-insert runs as a single atomic
//!   step, so concurrent callers racing on the same key still end up sharing
//!   one canonical record. Enable the `dashmap-backend` feature to swap the
//!   default `RwLock` map for a lock-free one.
//! - **No eviction**: entries live as long as the cache. This is an
//!   interning cache, not a bounded cache.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod record;

#[cfg(feature = "serialization")]
pub mod serialization;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::cache::{CacheStats, Intern, InternCache};
    pub use crate::record::{
        combine, FieldValue, Internable, RecordError, RecordKey, RenderedView, SharedRecord,
        UniqueContext,
    };

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{CacheSerializer, JsonSerializer, SerializationError};
}
