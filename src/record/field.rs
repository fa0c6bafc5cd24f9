//! Field values for records and contexts.

use std::fmt;

/// A single field of a record or context.
///
/// Fields form a closed set of simple value kinds: text and integers. The
/// set is deliberately a tagged enum rather than a trait object, so field
/// equality, ordering, and hashing stay structural and total.
///
/// `From` impls cover the common literal forms, which keeps record
/// construction terse:
///
/// ```rust
/// use libintern::record::FieldValue;
///
/// let brand: FieldValue = "BMW".into();
/// let year: FieldValue = 2018.into();
/// assert_eq!(brand.to_string(), "BMW");
/// assert_eq!(year.to_string(), "2018");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum FieldValue {
    /// Free-form text field (brand, model, color, owner name, ...)
    Text(String),
    /// Integer field (year, capacity, reference number, ...)
    Number(i64),
}

impl FieldValue {
    /// True for text fields that are empty or whitespace-only.
    ///
    /// Blank fields are rejected at record-construction time; a record with
    /// a blank identity field would silently collapse onto other records
    /// missing the same field.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Borrow the text content, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// The numeric content, if this is a number field.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Number(n) => Some(*n),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(i64::from(n))
    }
}
