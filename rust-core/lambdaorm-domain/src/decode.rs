// SPDX-License-Identifier: PMPL-1.0-or-later
//! Typed decoding of service responses.
//!
//! Every record the service returns implements [`Decode`], which offers two
//! explicit entry points: [`Decode::decode`] for a single JSON object and
//! [`Decode::decode_many`] for a JSON array of objects. The list variant is
//! built on the single one, so both apply the same defaulting rules:
//!
//! - missing optional keys fall back to the record's declared default
//!   (empty list, `None`, empty string, zero);
//! - unknown keys are ignored;
//! - enumerated fields reject literals outside their closed set.
//!
//! Shape mismatches (an array where an object is expected, or the reverse)
//! are reported as [`MappingError::Shape`] before any field is read.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{MappingError, Result};

/// Conversion from parsed JSON into a typed record.
pub trait Decode: DeserializeOwned {
    /// Record name used in error messages.
    const RECORD: &'static str;

    /// Decode a single record from a JSON object.
    fn decode(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(MappingError::shape(Self::RECORD, "object", value));
        }
        Self::deserialize(value).map_err(|source| MappingError::Invalid {
            record: Self::RECORD,
            source,
        })
    }

    /// Decode an ordered list of records from a JSON array of objects.
    ///
    /// The first element that fails aborts the whole conversion.
    fn decode_many(value: &Value) -> Result<Vec<Self>> {
        let Value::Array(items) = value else {
            return Err(MappingError::shape(Self::RECORD, "array", value));
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Self::decode(item).map_err(|err| MappingError::Element {
                    record: Self::RECORD,
                    index,
                    source: Box::new(err),
                })
            })
            .collect()
    }

    /// Parse `text` as JSON, then [`decode`](Decode::decode) it.
    fn decode_str(text: &str) -> Result<Self> {
        Self::decode(&parse::<Self>(text)?)
    }

    /// Parse `text` as JSON, then [`decode_many`](Decode::decode_many) it.
    fn decode_many_str(text: &str) -> Result<Vec<Self>> {
        Self::decode_many(&parse::<Self>(text)?)
    }
}

fn parse<T: Decode>(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| MappingError::Invalid {
        record: T::RECORD,
        source,
    })
}

/// Treat an explicit `null` like an absent key.
///
/// Used on every defaulted non-`Option` field, so `null`, a missing key and
/// the empty value all read the same. Recursive `children` lists terminate on
/// any of the three.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Implement [`Decode`] for records whose name in errors is the type name.
macro_rules! impl_decode {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::decode::Decode for $ty {
                const RECORD: &'static str = stringify!($ty);
            }
        )+
    };
}

pub(crate) use impl_decode;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Probe {
        name: String,
        size: Option<u32>,
        #[serde(deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    impl_decode!(Probe);

    #[test]
    fn test_decode_rejects_non_object() {
        let err = Probe::decode(&json!("Orders")).unwrap_err();
        assert!(matches!(
            err,
            MappingError::Shape {
                expected: "object",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_many_rejects_object() {
        let err = Probe::decode_many(&json!({"name": "x"})).unwrap_err();
        assert!(matches!(
            err,
            MappingError::Shape {
                expected: "array",
                found: "object",
                ..
            }
        ));
    }

    #[test]
    fn test_defaults_and_unknown_keys() {
        let probe = Probe::decode(&json!({"extra": 1})).unwrap();
        assert_eq!(probe, Probe::default());
    }

    #[test]
    fn test_null_list_is_empty() {
        let probe = Probe::decode(&json!({"name": "a", "tags": null})).unwrap();
        assert!(probe.tags.is_empty());
    }

    #[test]
    fn test_element_error_carries_index() {
        let err = Probe::decode_many(&json!([{"name": "a"}, 7])).unwrap_err();
        match err {
            MappingError::Element { index, source, .. } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, MappingError::Shape { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_scalar_type_is_invalid() {
        let err = Probe::decode(&json!({"size": "big"})).unwrap_err();
        assert!(matches!(err, MappingError::Invalid { record: "Probe", .. }));
    }

    #[test]
    fn test_decode_str_rejects_malformed_text() {
        assert!(matches!(
            Probe::decode_str("{not json").unwrap_err(),
            MappingError::Invalid { .. }
        ));
        assert_eq!(Probe::decode_many_str("[]").unwrap(), vec![]);
    }
}
