//! Untyped task records.
//!
//! The project-management API returns tasks as arbitrary nested JSON
//! objects. Only the paths named by the field mapping are meaningful, so
//! records are kept as a tagged union and navigated at runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A task record as returned by the API: string keys to arbitrary values.
pub type RawTask = BTreeMap<String, RawValue>;

/// A JSON value with integers and floats kept apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// A number that fits in an `i64`.
    Int(i64),
    /// Any other number.
    Float(f64),
    /// JSON string.
    String(String),
    /// JSON array.
    List(Vec<RawValue>),
    /// JSON object.
    Map(BTreeMap<String, RawValue>),
}

/// The kind of a [`RawValue`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

impl RawValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Null => ValueKind::Null,
            RawValue::Bool(_) => ValueKind::Bool,
            RawValue::Int(_) => ValueKind::Int,
            RawValue::Float(_) => ValueKind::Float,
            RawValue::String(_) => ValueKind::String,
            RawValue::List(_) => ValueKind::List,
            RawValue::Map(_) => ValueKind::Map,
        }
    }

    /// Returns the nested map if this value is an object.
    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => RawValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => RawValue::String(s),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(map) => RawValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_record() {
        let task: RawTask = serde_json::from_value(json!({
            "content": "Write docs",
            "isDone": false,
            "priority": 3,
            "progress": 0.5,
            "executor": {"name": "alice", "tags": ["a", "b"]},
            "dueDate": null
        }))
        .unwrap();

        assert_eq!(task["content"], RawValue::String("Write docs".into()));
        assert_eq!(task["isDone"], RawValue::Bool(false));
        assert_eq!(task["priority"], RawValue::Int(3));
        assert_eq!(task["progress"].kind(), ValueKind::Float);
        assert_eq!(task["dueDate"], RawValue::Null);

        let executor = task["executor"].as_map().unwrap();
        assert_eq!(executor["name"], RawValue::String("alice".into()));
        assert_eq!(executor["tags"].kind(), ValueKind::List);
    }

    #[test]
    fn test_from_json_value_matches_deserialize() {
        let raw = json!({"a": {"b": 1, "c": [true, "x"]}, "d": 2.5});
        let via_from = RawValue::from(raw.clone());
        let via_serde: RawValue = serde_json::from_value(raw).unwrap();
        assert_eq!(via_from, via_serde);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(RawValue::Null.kind().to_string(), "null");
        assert_eq!(RawValue::from("x").kind().to_string(), "string");
        assert_eq!(RawValue::from(7i64).kind().to_string(), "int");
        assert_eq!(RawValue::Map(BTreeMap::new()).kind().to_string(), "map");
    }
}
