//! # Canonical Serialization — Deterministic Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for
//! bytes used in digest computation and signature verification across the
//! admission core.
//!
//! ## Security Invariant
//!
//! `CanonicalBytes` has a private inner field. The only way to construct one
//! is through [`canonicalize`], which walks a [`Value`] applying NFC
//! normalization, finite-float enforcement, and UTF-8 byte-order key sorting
//! before emitting bytes. Any function that computes a digest or verifies a
//! signature must accept `&CanonicalBytes`; there is no path to one that
//! skips normalization.
//!
//! ## Encoding Rules
//!
//! - `null`, `true`, `false`: identity.
//! - Integers: decimal, no leading zeros, optional leading `-`.
//! - Floats: must be finite (`CANON_INVALID_NUMBER` otherwise); compact JSON
//!   number form.
//! - Strings: NFC-normalized, then JSON-escaped with only the mandatory
//!   escapes (`"`, `\`, control characters below `0x20`); non-ASCII code
//!   points are emitted literally as UTF-8, never `\uXXXX`-escaped.
//! - Sequences: element order preserved, `,` separator, no whitespace.
//! - Mappings: keys NFC-normalized; two keys normalizing to the same string
//!   within one mapping fail with `CANON_DUPLICATE_KEY_AFTER_NORMALIZATION`;
//!   surviving keys are sorted by UTF-8 byte sequence (not code point, not
//!   locale) and emitted as `"k":v` pairs separated by `,`.
//! - Recursion deeper than [`MAX_DEPTH`] fails with `CANON_DEPTH_EXCEEDED`.

use unicode_normalization::UnicodeNormalization;

use crate::error::CanonicalizationError;
use crate::value::Value;

/// Maximum nesting depth the canonicalizer will descend before failing
/// closed with `CANON_DEPTH_EXCEEDED`. Chosen well above any legitimate
/// envelope shape while bounding stack usage against pathological input.
pub const MAX_DEPTH: usize = 64;

/// Bytes produced exclusively by the canonicalization pipeline.
///
/// # Invariants
///
/// - The only constructor is [`canonicalize`].
/// - Output is valid UTF-8 and valid JSON.
/// - Mapping keys are sorted by UTF-8 byte sequence with no duplicates
///   after NFC normalization.
/// - No non-finite floats are present.
///
/// These invariants cannot be violated by downstream code because the
/// inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonicalize a structured value into its unique byte serialization.
///
/// For any two values that are semantically equal under the normalization
/// rules, this produces identical bytes; for any two distinct normalized
/// values, it produces distinct bytes.
pub fn canonicalize(value: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
    let mut out = String::new();
    write_value(value, 0, &mut out)?;
    Ok(CanonicalBytes(out.into_bytes()))
}

fn write_value(value: &Value, depth: usize, out: &mut String) -> Result<(), CanonicalizationError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalizationError::DepthExceeded(MAX_DEPTH));
    }
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => write_float(*f, out)?,
        Value::String(s) => write_string(s, out),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, depth + 1, out)?;
            }
            out.push(']');
        }
        Value::Mapping(entries) => write_mapping(entries, depth, out)?,
    }
    Ok(())
}

fn write_float(f: f64, out: &mut String) -> Result<(), CanonicalizationError> {
    if !f.is_finite() {
        return Err(CanonicalizationError::InvalidNumber(f));
    }
    // Defer to serde_json's number formatter for the shortest round-trippable
    // compact form rather than reinventing float-to-string rules.
    let number = serde_json::Number::from_f64(f).ok_or(CanonicalizationError::InvalidNumber(f))?;
    out.push_str(&number.to_string());
    Ok(())
}

fn write_string(s: &str, out: &mut String) {
    let normalized: String = s.nfc().collect();
    out.push('"');
    for c in normalized.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_mapping(
    entries: &[(String, Value)],
    depth: usize,
    out: &mut String,
) -> Result<(), CanonicalizationError> {
    let mut normalized: Vec<(String, &Value)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let nfc_key: String = key.nfc().collect();
        if normalized.iter().any(|(k, _)| k == &nfc_key) {
            return Err(CanonicalizationError::DuplicateKeyAfterNormalization);
        }
        normalized.push((nfc_key, value));
    }
    normalized.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    out.push('{');
    for (i, (key, value)) in normalized.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, depth + 1, out)?;
    }
    out.push('}');
    Ok(())
}

/// Build the `{header, meta, payload}` triple that is hashed and signed.
///
/// `meta` defaults to an empty mapping when absent. Construction order is
/// not semantically significant — the canonicalizer re-sorts keys — but
/// this is the exact three-key subset that must be hashed; `signature` is
/// never included.
pub fn canonical_input(header: Value, meta: Option<Value>, payload: Value) -> Value {
    Value::Mapping(vec![
        ("header".to_string(), header),
        ("meta".to_string(), meta.unwrap_or_else(Value::empty_mapping)),
        ("payload".to_string(), payload),
    ])
}
