//! # Envelope — The Admission Pipeline's Input Type
//!
//! `Envelope` is a thin, non-owning view over a parsed [`Value`] tree with
//! accessors for the three recognized top-level regions (`header`, `meta`,
//! `payload`) plus the detached `signature` field. It does not itself
//! enforce the schema — that is the Schema Validator's job — but it does
//! guarantee that `canonical_input()` always builds the exact
//! `{header, meta, payload}` triple the signature was computed over,
//! excluding `signature` itself.

use thiserror::Error;

use crate::canonical::canonical_input;
use crate::value::Value;

/// `header` or `payload` was absent when building `canonical_input()`.
///
/// `meta` is exempt — it defaults to an empty mapping, same as the
/// source this was ported from. `header` and `payload` are not: a
/// structurally malformed envelope must surface this rather than
/// silently canonicalize around a missing region.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("envelope is missing its {0} region")]
pub struct MissingRegion(pub &'static str);

/// A parsed envelope, backed by a generic structured value.
///
/// Construction never fails: an `Envelope` may be missing fields a real
/// submission would need (that's the schema validator's concern).
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    root: Value,
}

impl Envelope {
    /// Wrap a raw structured value as an envelope.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The underlying structured value, for introspection or re-serialization.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// The `header` region, or `None` if absent.
    pub fn header(&self) -> Option<Value> {
        self.root.get("header").cloned()
    }

    /// The `meta` region, defaulting to an empty mapping if absent.
    pub fn meta(&self) -> Value {
        self.root.get("meta").cloned().unwrap_or_else(Value::empty_mapping)
    }

    /// The `payload` region, or `None` if absent.
    pub fn payload(&self) -> Option<Value> {
        self.root.get("payload").cloned()
    }

    /// `header.type`, if `header` and the nested field are both present and a string.
    pub fn header_type(&self) -> Option<String> {
        self.header()?.get("type").and_then(Value::as_str).map(str::to_string)
    }

    /// `header.source_agent`, if `header` and the nested field are both present and a string.
    pub fn source_agent(&self) -> Option<String> {
        self.header()?.get("source_agent").and_then(Value::as_str).map(str::to_string)
    }

    /// `meta.security_level`, if present and a string.
    pub fn security_level(&self) -> Option<String> {
        self.meta().get("security_level").and_then(Value::as_str).map(str::to_string)
    }

    /// The raw `signature` field, if present and a string.
    ///
    /// Never included in `canonical_input()` — the signature is computed
    /// over the triple, not over itself.
    pub fn signature(&self) -> Option<String> {
        self.root.get("signature").and_then(Value::as_str).map(str::to_string)
    }

    /// Build the `{header, meta, payload}` triple that is hashed and signed.
    ///
    /// Errors if `header` or `payload` is absent — the caller (the
    /// quarantine serializer, most notably) is expected to fall back to
    /// canonicalizing the whole envelope when this happens.
    pub fn canonical_input(&self) -> Result<Value, MissingRegion> {
        let header = self.header().ok_or(MissingRegion("header"))?;
        let payload = self.payload().ok_or(MissingRegion("payload"))?;
        Ok(canonical_input(header, Some(self.meta()), payload))
    }
}
