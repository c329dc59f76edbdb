use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Property key holding a feature's display name
pub const NAME_KEY: &str = "name";

/// Arbitrary feature properties keyed by name
pub type Properties = BTreeMap<String, PropertyValue>;

/// A JSON-like property value.
///
/// Decoding tries the variants top to bottom, so `3` is an `Integer` while
/// `3.0` falls through to `Number`, and integers beyond `i64` become `Number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Null,
    Array(Vec<PropertyValue>),
    Object(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> PropertyValue {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_order() {
        assert_eq!(decode("\"trail\""), PropertyValue::String("trail".into()));
        assert_eq!(decode("42"), PropertyValue::Integer(42));
        assert_eq!(decode("-7"), PropertyValue::Integer(-7));
        assert_eq!(decode("3.0"), PropertyValue::Number(3.0));
        assert_eq!(decode("true"), PropertyValue::Bool(true));
        assert_eq!(decode("null"), PropertyValue::Null);
    }

    #[test]
    fn test_large_unsigned_falls_back_to_number() {
        assert!(matches!(
            decode("18446744073709551615"),
            PropertyValue::Number(_)
        ));
    }

    #[test]
    fn test_nested_values() {
        let value = decode(r#"{"tags": ["a", 1, null], "meta": {"ok": false}}"#);
        let PropertyValue::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(
            map["tags"],
            PropertyValue::Array(vec![
                PropertyValue::String("a".into()),
                PropertyValue::Integer(1),
                PropertyValue::Null,
            ])
        );
        let PropertyValue::Object(meta) = &map["meta"] else {
            panic!("expected nested object");
        };
        assert_eq!(meta["ok"], PropertyValue::Bool(false));
    }

    #[test]
    fn test_null_serializes_as_null() {
        assert_eq!(serde_json::to_string(&PropertyValue::Null).unwrap(), "null");
    }
}
