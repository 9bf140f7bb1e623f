//! Record abstraction over a fixed, ordered set of named text fields
//!
//! A record type enumerates its fields at compile time via [`Record::FIELDS`].
//! Scoring iterates that list instead of discovering keys at runtime, so the
//! field set is part of the type's contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named field of a record type.
pub trait RecordField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Stable field name, used in logs and serialized output
    fn name(&self) -> &'static str;
}

/// A record made of optional text fields.
///
/// A field returning `None` is absent; `Some("")` is present but empty.
/// Absent fields are excluded from weighting, empty ones weigh zero.
pub trait Record: Clone + Send + Sync {
    type Field: RecordField;

    /// Every field of this record type, in scoring order
    const FIELDS: &'static [Self::Field];

    /// Text of `field`, or `None` when absent
    fn field(&self, field: Self::Field) -> Option<&str>;

    /// Whether any field is present
    fn has_any_field(&self) -> bool {
        Self::FIELDS.iter().any(|&f| self.field(f).is_some())
    }

    /// Whether any field carries at least one character
    fn has_text(&self) -> bool {
        Self::FIELDS
            .iter()
            .any(|&f| self.field(f).is_some_and(|text| !text.is_empty()))
    }
}

/// A record paired with the identifier it is stored under.
///
/// Delegates [`Record`] to the inner record so stored contents can be
/// ranked directly and come back with their id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedRecord<R> {
    pub id: String,
    pub record: R,
}

impl<R> KeyedRecord<R> {
    pub fn new(id: impl Into<String>, record: R) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}

impl<R: Record> Record for KeyedRecord<R> {
    type Field = R::Field;

    const FIELDS: &'static [Self::Field] = R::FIELDS;

    fn field(&self, field: Self::Field) -> Option<&str> {
        self.record.field(field)
    }
}
