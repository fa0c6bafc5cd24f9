//! Shared (intrinsic) state records and their structural keys.

use crate::record::{FieldValue, Internable};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// Records rarely carry more than a handful of identity fields, so field
/// tuples this size and under stay inline without a heap allocation.
const INLINE_FIELDS: usize = 4;

/// Errors raised when constructing a record or context from raw fields.
///
/// Validation happens once, at the construction boundary. The cache itself
/// never sees malformed values and never partially inserts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The field tuple was empty.
    ///
    /// A zero-field record has no identity to intern; every such record
    /// would collapse onto a single cache entry.
    #[error("record requires at least one field")]
    NoFields,

    /// A text field at the given position was empty or whitespace-only.
    #[error("field {0} is blank")]
    BlankField(usize),
}

pub(crate) fn validate_fields(fields: &[FieldValue]) -> Result<(), RecordError> {
    if fields.is_empty() {
        return Err(RecordError::NoFields);
    }
    if let Some(idx) = fields.iter().position(FieldValue::is_blank) {
        return Err(RecordError::BlankField(idx));
    }
    Ok(())
}

/// An immutable shared-state record: an ordered tuple of [`FieldValue`]s.
///
/// A `SharedRecord` holds the state that is common to many logical entities
/// and therefore safe to deduplicate: a car's make/model/color, a glyph's
/// font family and size. Two records with equal field tuples are the same
/// canonical entity; the cache guarantees at most one stored instance per
/// distinct tuple.
///
/// Once constructed a record's fields never change: the only accessors are
/// read-only, and the cache hands out shared handles rather than mutable
/// references.
///
/// # Examples
///
/// ```rust
/// use libintern::record::SharedRecord;
///
/// let record = SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap();
/// assert_eq!(record.arity(), 3);
/// assert_eq!(record.to_string(), "[BMW, M5, red]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SharedRecord {
    fields: SmallVec<[FieldValue; INLINE_FIELDS]>,
}

impl SharedRecord {
    /// Constructs a record from an ordered tuple of fields.
    ///
    /// This is the validation boundary for shared state: the tuple must be
    /// non-empty and free of blank text fields.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NoFields`] if `fields` yields nothing
    /// - [`RecordError::BlankField`] for the first empty/whitespace text field
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libintern::record::{RecordError, SharedRecord};
    ///
    /// assert!(SharedRecord::new(["BMW".into(), "M5".into()]).is_ok());
    /// assert_eq!(SharedRecord::new([]), Err(RecordError::NoFields));
    /// assert_eq!(
    ///     SharedRecord::new(["BMW".into(), "  ".into()]),
    ///     Err(RecordError::BlankField(1)),
    /// );
    /// ```
    pub fn new<I>(fields: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = FieldValue>,
    {
        let fields: SmallVec<[FieldValue; INLINE_FIELDS]> = fields.into_iter().collect();
        validate_fields(&fields)?;
        Ok(Self { fields })
    }

    /// The ordered field tuple.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Number of fields in the tuple.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// The field at `index`, if in range.
    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }
}

impl fmt::Display for SharedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str("]")
    }
}

impl Internable for SharedRecord {
    type Key = RecordKey;

    fn intern_key(&self) -> RecordKey {
        RecordKey {
            fields: self.fields.clone(),
        }
    }
}

/// Structural key derived from a record's ordered field tuple.
///
/// The key *is* the field tuple: equality and hashing are structural, so
/// equal tuples always produce equal keys and distinct tuples can never
/// collide; there is no digest step to get wrong.
///
/// The key is order-sensitive: `[BMW, red]` and `[red, BMW]` are distinct
/// keys by design, since field position carries meaning.
///
/// `Display` renders the conventional underscore-joined form used in log
/// lines and snapshots:
///
/// ```rust
/// use libintern::prelude::*;
///
/// let record = SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap();
/// assert_eq!(record.intern_key().to_string(), "BMW_M5_red");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RecordKey {
    fields: SmallVec<[FieldValue; INLINE_FIELDS]>,
}

impl RecordKey {
    /// The ordered field tuple this key was derived from.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}
