//! # Value — The Generic Structured-Value Sum Type
//!
//! The canonicalizer and the envelope model are polymorphic over `Value`,
//! never over a host-language JSON type directly. The seven variants here
//! are exhaustive: `Null`, `Bool`, `Int`, `Float`, `String`, `Sequence`,
//! `Mapping`. There is no eighth variant to reject — unlike a dynamically
//! typed frontend, a Rust caller cannot construct a `Value` the
//! canonicalizer doesn't already know how to normalize.
//!
//! ## Security Invariant
//!
//! `Mapping` keys are `String`, not an arbitrary `Value` — a caller cannot
//! construct a mapping with a non-string key. This makes the
//! `CANON_NON_STRING_KEY` and `CANON_FORBIDDEN_TYPE` failure modes of the
//! canonicalizer structurally unreachable from safe code (see error.rs);
//! the codes remain part of the taxonomy for cross-language log parity.

use std::fmt;

use serde_json::{Number, Value as JsonValue};

/// A structured value in the admission core's generic data model.
///
/// Mirrors the JSON data model but keeps floats distinct from integers so
/// the canonicalizer can apply separate integer/float encoding rules, and
/// keeps `Mapping` entries as an ordered `Vec` (not a `BTreeMap`) so
/// duplicate-after-normalization detection can see both original entries
/// before the canonicalizer re-sorts them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// An empty mapping — the default for an envelope's absent `meta` region.
    pub fn empty_mapping() -> Self {
        Value::Mapping(Vec::new())
    }

    /// Look up a key in a `Mapping`; returns `None` for any other variant
    /// or a missing key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Borrow the string inside a `String` value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the entries of a `Mapping`, if this is one.
    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Mapping(entries) => Some(entries.as_slice()),
            _ => None,
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => number_to_value(&n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(u) = n.as_u64() {
        // u64 values beyond i64::MAX have no integer representation in this
        // model; fall back to float rather than silently truncating.
        if u <= i64::MAX as u64 {
            Value::Int(u as i64)
        } else {
            Value::Float(u as f64)
        }
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Convert back to `serde_json::Value` for interop with JSON-based tooling
/// (schema validation, HTTP bodies, quarantine decoding in tests).
///
/// Non-finite floats have no JSON representation; they are mapped to `null`.
/// This only affects pre-canonicalization inspection — a non-finite float
/// is rejected by the canonicalizer itself with `CANON_INVALID_NUMBER`
/// before any accept/reject decision is finalized.
impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map(JsonValue::Number).unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Sequence(items) => JsonValue::Array(items.iter().map(JsonValue::from).collect()),
            Value::Mapping(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(k.clone(), JsonValue::from(v));
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", JsonValue::from(self))
    }
}
