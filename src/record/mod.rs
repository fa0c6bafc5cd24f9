//! Record abstractions for interning.
//!
//! This module defines the data model around the cache: the [`Internable`]
//! trait that record types implement to declare their canonical identity,
//! the provided [`SharedRecord`] field-tuple record, the per-call
//! [`UniqueContext`] that is combined with a record at the point of use,
//! and the [`RenderedView`] produced by that pairing.
//!
//! The split mirrors the two halves of an entity's state:
//!
//! - **Shared (intrinsic) state**: fields that define identity and are safe
//!   to deduplicate across many logical instances ([`SharedRecord`]).
//! - **Unique (extrinsic) state**: per-call data that must never be
//!   deduplicated or stored long-term ([`UniqueContext`]).

pub mod context;
pub mod field;
pub mod shared;

pub use context::{combine, RenderedView, UniqueContext};
pub use field::FieldValue;
pub use shared::{RecordError, RecordKey, SharedRecord};

use std::hash::Hash;

/// Types whose values can be interned by an [`InternCache`](crate::cache::InternCache).
///
/// An implementor declares a key type and a pure derivation from its
/// identity-defining fields to that key. Two values with equal keys are
/// treated as the same canonical entity: the cache stores at most one of
/// them and serves it for every equal-keyed request.
///
/// # Contract
///
/// - `intern_key` must be a pure function of the fields that define
///   canonical identity. Equal field values must always produce equal keys.
/// - Per-call (extrinsic) data must never feed into the key. Folding, say,
///   an owner name into the key of a vehicle profile would make every
///   request a miss and defeat deduplication entirely.
/// - Prefer structural keys (the fields themselves, or a tuple of them)
///   over hash digests: structural equality makes a collision between
///   distinct records impossible rather than merely improbable.
///
/// # Examples
///
/// ```rust
/// use libintern::prelude::*;
///
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct GlyphStyle {
///     family: String,
///     size_pt: u16,
/// }
///
/// impl Internable for GlyphStyle {
///     type Key = (String, u16);
///
///     fn intern_key(&self) -> Self::Key {
///         (self.family.clone(), self.size_pt)
///     }
/// }
///
/// let cache = InternCache::new();
/// let a = cache.get_or_create(GlyphStyle { family: "Mono".into(), size_pt: 12 });
/// let b = cache.get_or_create(GlyphStyle { family: "Mono".into(), size_pt: 12 });
/// assert!(Intern::shares_storage(&a, &b));
/// assert_eq!(cache.len(), 1);
/// ```
pub trait Internable: Clone {
    /// Key under which canonical records are stored and looked up.
    type Key: Clone + Eq + Hash;

    /// Derives the canonical-identity key for this value.
    fn intern_key(&self) -> Self::Key;
}
