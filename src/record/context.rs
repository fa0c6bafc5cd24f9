//! Unique (extrinsic) state and the point-of-use pairing.

use crate::record::shared::{validate_fields, RecordError};
use crate::record::FieldValue;
use smallvec::SmallVec;
use std::fmt;

/// Per-invocation fields this size and under stay inline.
const INLINE_FIELDS: usize = 2;

/// Caller-supplied per-invocation state.
///
/// A `UniqueContext` carries the data that varies per logical entity (an
/// owner's name, a plate or reference number) and is paired with a
/// canonical record only at the point of use. It is never stored in the
/// cache and never participates in key derivation, so it can never defeat
/// deduplication.
///
/// Construction goes through the same validating boundary as
/// [`SharedRecord`](crate::record::SharedRecord): non-empty tuple, no blank
/// text fields.
///
/// # Examples
///
/// ```rust
/// use libintern::record::UniqueContext;
///
/// let ctx = UniqueContext::new(["James Doe".into(), "CL234IR".into()]).unwrap();
/// assert_eq!(ctx.to_string(), "[James Doe, CL234IR]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct UniqueContext {
    fields: SmallVec<[FieldValue; INLINE_FIELDS]>,
}

impl UniqueContext {
    /// Constructs a context from an ordered tuple of fields.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NoFields`] if `fields` yields nothing
    /// - [`RecordError::BlankField`] for the first empty/whitespace text field
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

    /// The field at `index`, if in range.
    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }
}

impl fmt::Display for UniqueContext {
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

/// The pairing of a canonical shared record with per-call unique state.
///
/// A `RenderedView` is produced by [`combine`] (or the
/// [`Intern::combine`](crate::cache::Intern::combine) convenience) purely
/// from its two inputs: it borrows the shared record, takes the unique part
/// by value, and touches no cache state. Dropping the view discards the
/// unique state; the canonical record is untouched either way.
///
/// The textual form pairs both halves; [`shared`](RenderedView::shared) and
/// [`unique`](RenderedView::unique) give structured access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView<'a, T, U> {
    shared: &'a T,
    unique: U,
}

impl<'a, T, U> RenderedView<'a, T, U> {
    /// The canonical shared record half of the pairing.
    pub fn shared(&self) -> &T {
        self.shared
    }

    /// The per-call unique half of the pairing.
    pub fn unique(&self) -> &U {
        &self.unique
    }
}

impl<T, U> fmt::Display for RenderedView<'_, T, U>
where
    T: fmt::Display,
    U: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shared ({}) + unique ({})", self.shared, self.unique)
    }
}

/// Pairs a canonical record with per-call unique state.
///
/// Pure function: no cache interaction, no failure modes. The usual entry
/// point is [`Intern::combine`](crate::cache::Intern::combine), which calls
/// this with the handle's record.
///
/// # Examples
///
/// ```rust
/// use libintern::prelude::*;
///
/// let record = SharedRecord::new(["BMW".into(), "M5".into(), "red".into()]).unwrap();
/// let ctx = UniqueContext::new(["James Doe".into(), "CL234IR".into()]).unwrap();
///
/// let view = combine(&record, &ctx);
/// assert_eq!(
///     view.to_string(),
///     "shared ([BMW, M5, red]) + unique ([James Doe, CL234IR])",
/// );
/// ```
pub fn combine<T, U>(shared: &T, unique: U) -> RenderedView<'_, T, U> {
    RenderedView { shared, unique }
}
