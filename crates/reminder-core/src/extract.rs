//! Dotted-path field extraction.
//!
//! A field mapping such as `executor.name` names a path through nested
//! maps of a [`RawTask`]. [`extract`] walks the path and type-checks the
//! leaf, so callers never deal with raw values.

use reminder_models::{RawTask, RawValue, ValueKind};

use crate::error::ExtractError;

/// A scalar type that can sit at the end of a field path.
pub trait FieldValue: Sized {
    /// The kind a stored value must have to convert.
    const KIND: ValueKind;

    /// Converts a raw value of exactly [`Self::KIND`].
    fn from_raw(value: &RawValue) -> Option<Self>;
}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FieldValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Looks up `path` (segments separated by `.`) in `record`.
///
/// # Errors
/// - [`ExtractError::Missing`] if any segment is absent
/// - [`ExtractError::NotNavigable`] if an intermediate value is not a map
/// - [`ExtractError::TypeMismatch`] if the leaf is not of kind `T`
pub fn extract<T: FieldValue>(record: &RawTask, path: &str) -> Result<T, ExtractError> {
    let missing = |segment: &str| ExtractError::Missing {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    let mut segments = path.split('.').peekable();
    let mut current = record;

    while let Some(segment) = segments.next() {
        let value = current.get(segment).ok_or_else(|| missing(segment))?;

        if segments.peek().is_none() {
            return T::from_raw(value).ok_or_else(|| ExtractError::TypeMismatch {
                path: path.to_string(),
                expected: T::KIND,
                found: value.kind(),
            });
        }

        current = value.as_map().ok_or_else(|| ExtractError::NotNavigable {
            path: path.to_string(),
            segment: segment.to_string(),
            found: value.kind(),
        })?;
    }

    // split() always yields at least one segment
    Err(missing(path))
}
