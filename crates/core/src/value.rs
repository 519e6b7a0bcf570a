//! Value types for observable properties
//!
//! This module defines:
//! - Value: Unified enum for every property value a proxy can store
//! - ValueType: The declared type of a property slot
//! - FloatEquality: How float payloads are compared by the change gate
//!
//! ## Equality Rules
//!
//! - `Null == Null`, and `Null` is unequal to every non-null value
//! - Different variants are NEVER equal: `Int(1) != Float(1.0)`
//! - `Bytes` are not `String`
//! - Floats follow the configured [`FloatEquality`] (IEEE-754 by default)
//!
//! The `PartialEq` impl uses IEEE-754 semantics. The change gate in the
//! engine calls [`Value::equals`] with the policy from its configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A property value stored by a proxy instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null value (the default of every reference-like slot)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Array of values
    Array(Vec<Value>),
    /// Object with string keys
    Object(HashMap<String, Value>),
}

/// Float comparison policy used when deciding whether a write is a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatEquality {
    /// IEEE-754: `NaN != NaN`, `-0.0 == 0.0`
    #[default]
    Ieee,
    /// Bit patterns: an identical `NaN` is equal to itself, `-0.0 != 0.0`
    Bitwise,
}

impl FloatEquality {
    fn floats_equal(self, a: f64, b: f64) -> bool {
        match self {
            FloatEquality::Ieee => a == b,
            FloatEquality::Bitwise => a.to_bits() == b.to_bits(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, FloatEquality::Ieee)
    }
}

impl Value {
    /// Value equality under the given float policy.
    ///
    /// Arrays and objects recurse with the same policy.
    pub fn equals(&self, other: &Value, floats: FloatEquality) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => floats.floats_equal(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, floats))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.equals(w, floats)))
            }
            _ => false,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// The [`ValueType`] this value inhabits (`Null` reports `Any`).
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Any,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Array(a) => write!(f, "[{} items]", a.len()),
            Value::Object(o) => write!(f, "{{{} keys}}", o.len()),
        }
    }
}

// ============================================================================
// Declared slot types
// ============================================================================

/// Declared type of a property slot.
///
/// Only used for signature matching and default values; written values are
/// not validated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Untyped slot
    Any,
    /// Boolean slot
    Bool,
    /// Integer slot
    Int,
    /// Float slot
    Float,
    /// String slot
    String,
    /// Bytes slot
    Bytes,
    /// Array slot
    Array,
    /// Object slot
    Object,
}

impl ValueType {
    /// Type name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Any => "Any",
            ValueType::Bool => "Bool",
            ValueType::Int => "Int",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Bytes => "Bytes",
            ValueType::Array => "Array",
            ValueType::Object => "Object",
        }
    }

    /// Value a slot of this type holds before anything is written.
    ///
    /// Scalars start at their zero value; reference-like slots start at `Null`.
    pub fn default_value(self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Any
            | ValueType::String
            | ValueType::Bytes
            | ValueType::Array
            | ValueType::Object => Value::Null,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(o: HashMap<String, Value>) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
