// SPDX-License-Identifier: PMPL-1.0-or-later
//! Mapping error types.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning loosely typed JSON into a domain record.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The input had the wrong JSON shape for the requested entry point
    /// (e.g. a string where an object was required).
    #[error("{record}: expected {expected}, found {found}")]
    Shape {
        record: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The input had the right shape but a field did not fit the record:
    /// a required field was missing, a scalar had the wrong type, or an
    /// enumerated value was outside its closed set.
    #[error("{record}: {source}")]
    Invalid {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// One element of a list failed to decode.
    #[error("{record}[{index}]: {source}")]
    Element {
        record: &'static str,
        index: usize,
        #[source]
        source: Box<MappingError>,
    },
}

impl MappingError {
    pub(crate) fn shape(record: &'static str, expected: &'static str, found: &Value) -> Self {
        MappingError::Shape {
            record,
            expected,
            found: json_kind(found),
        }
    }

    /// Name of the record type the failure was reported for.
    pub fn record(&self) -> &'static str {
        match self {
            MappingError::Shape { record, .. }
            | MappingError::Invalid { record, .. }
            | MappingError::Element { record, .. } => record,
        }
    }
}

/// Human-readable name of a JSON value's shape.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Crate-level result alias using [`MappingError`].
pub type Result<T> = std::result::Result<T, MappingError>;
