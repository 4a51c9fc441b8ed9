//! Runtime values in Gauge
//!
//! Values can be numbers, text, booleans, objects, lists, null, or errors.
//! Errors propagate through plugin calls.

use crate::GaugeError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Runtime value passed to and returned from plugins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(GaugeError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&GaugeError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // ========== Object Field Access ==========

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => {
                map.get(key).cloned().unwrap_or_else(|| {
                    Value::Error(GaugeError::undefined_field(key))
                })
            }
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(GaugeError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    // ========== Type Coercion ==========

    /// Convert to number (may return Error)
    pub fn to_number(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(e) => Value::Error(GaugeError::parse_error(format!("'{}': {}", s, e))),
            },
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(GaugeError::type_error("Number", self.type_name())),
        }
    }

    // ========== JSON Bridge ==========

    /// Render as plain JSON (errors become `{"_error": {...}}`)
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(n.to_string())),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::List(l) => JsonValue::Array(l.iter().map(Value::to_json).collect()),
            Value::Object(o) => JsonValue::Object(
                o.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Error(e) => serde_json::json!({
                "_error": { "code": e.code, "message": e.message, "suggestion": e.suggestion }
            }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(_) => write!(f, "[Object]"),
            Value::List(items) => {
                // Smart list display: show values for small lists, count for large
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for convenience
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<GaugeError> for Value {
    fn from(e: GaugeError) -> Self {
        Value::Error(e)
    }
}
