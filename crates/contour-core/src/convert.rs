//! # Document Conversion
//!
//! Builds [`Value`] trees from parsed JSON and YAML documents so that
//! configuration files, API payloads and fixtures can be checked directly.
//!
//! - JSON object keys become `Str` keys. YAML mapping keys keep their own
//!   category (a YAML map may be keyed by integers or booleans).
//! - Integers that fit `i64` stay integers; larger unsigned integers and
//!   all other numbers become floats.
//! - YAML tags are ignored and the tagged value is converted.
//! - Neither format can produce [`Value::Undefined`] or symbols.

use crate::error::ContourError;
use crate::value::{Value, ValueMap};

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => json_number(n),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::Seq(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(object) => Value::Map(
                object
                    .iter()
                    .map(|(k, v)| (Value::Str(k.clone()), Value::from(v)))
                    .collect::<ValueMap>(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

fn json_number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else {
        // u64 beyond i64::MAX or a true float.
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&serde_yaml::Value> for Value {
    fn from(yaml: &serde_yaml::Value) -> Self {
        match yaml {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::Str(s.clone()),
            serde_yaml::Value::Sequence(seq) => Value::Seq(seq.iter().map(Value::from).collect()),
            serde_yaml::Value::Mapping(mapping) => Value::Map(
                mapping
                    .iter()
                    .map(|(k, v)| (Value::from(k), Value::from(v)))
                    .collect::<ValueMap>(),
            ),
            // Ignore YAML tags, just convert the inner value.
            serde_yaml::Value::Tagged(tagged) => Value::from(&tagged.value),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(yaml: serde_yaml::Value) -> Self {
        Value::from(&yaml)
    }
}

impl Value {
    /// Parse a JSON document into a value.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Serialization` if the text is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ContourError> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ContourError::Serialization(format!("invalid JSON: {e}")))?;
        Ok(Value::from(&json))
    }

    /// Parse a YAML document into a value.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Serialization` if the text is not valid YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, ContourError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| ContourError::Serialization(format!("invalid YAML: {e}")))?;
        Ok(Value::from(&yaml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_string_keyed_maps() {
        let value = Value::from(json!({"name": "x", "tags": ["a", 1], "ok": true, "none": null}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Value::from("name")), Some(&Value::from("x")));
        assert_eq!(
            map.get(&Value::from("tags")),
            Some(&Value::seq([Value::from("a"), Value::Int(1)]))
        );
        assert_eq!(map.get(&Value::from("ok")), Some(&Value::Bool(true)));
        assert_eq!(map.get(&Value::from("none")), Some(&Value::Null));
        assert!(!map.contains_key(&Value::sym("name")));
    }

    #[test]
    fn json_numbers_keep_integer_category() {
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn yaml_keeps_non_string_keys() {
        let value = Value::from_yaml_str("1: one\ntrue: yes_value\nname: x\n").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Value::Int(1)), Some(&Value::from("one")));
        assert_eq!(map.get(&Value::Bool(true)), Some(&Value::from("yes_value")));
        assert_eq!(map.get(&Value::from("name")), Some(&Value::from("x")));
    }

    #[test]
    fn yaml_tags_are_stripped() {
        let value = Value::from_yaml_str("!custom 5").unwrap();
        assert_eq!(value, Value::Int(5));
    }

    #[test]
    fn invalid_documents_are_serialization_errors() {
        assert!(matches!(
            Value::from_json_str("{not json"),
            Err(ContourError::Serialization(_))
        ));
        assert!(matches!(
            Value::from_yaml_str("a: [unclosed"),
            Err(ContourError::Serialization(_))
        ));
    }
}
