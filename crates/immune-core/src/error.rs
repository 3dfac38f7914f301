//! # Error Types — Canonicalization Error Taxonomy
//!
//! Defines `CanonicalizationError`, the stable error code set for the
//! canonicalizer, plus the forward alias table and reverse legacy map
//! that let the admission pipeline surface a historical code alongside
//! a renamed one.
//!
//! ## Security Invariant
//!
//! These codes are part of the public contract — log analysis and
//! downstream tooling key off the exact strings. Renaming a variant
//! without registering an alias breaks that contract.

use thiserror::Error;

/// Error during canonical serialization.
///
/// Each variant carries a stable `code()` string that is embedded verbatim
/// in `AdmissionDecision::reason` on canonicalization failure. The `Display`
/// impl additionally carries a human-readable detail for logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanonicalizationError {
    /// A float value was NaN or infinite.
    #[error("non-finite number: {0}")]
    InvalidNumber(f64),

    /// A mapping key was not a string.
    ///
    /// Structurally unreachable through the safe `Value` API — `Value::Mapping`
    /// keys are `String` by construction, so this can only occur in a
    /// hand-rolled `Value` producer that bypasses the normal JSON ingestion
    /// path. Kept for error-taxonomy parity with deployments that canonicalize
    /// in a language without that guarantee.
    #[error("mapping key must be a string")]
    NonStringKey,

    /// A value variant outside the recognized sum type.
    ///
    /// Like `NonStringKey`, this is unreachable via `Value::from(serde_json::Value)`
    /// — the seven `Value` variants are exhaustive. Reserved for producers that
    /// extend the sum type incorrectly.
    #[error("unsupported value type")]
    ForbiddenType,

    /// Two mapping keys normalized to the same NFC form.
    #[error("duplicate map key after NFC normalization")]
    DuplicateKeyAfterNormalization,

    /// Recursion depth exceeded the implementation limit.
    #[error("nesting depth exceeded the maximum of {0}")]
    DepthExceeded(usize),

    /// The normalized value could not be encoded (should not occur given
    /// the other checks above; retained so the encoder can fail closed
    /// instead of panicking on an unanticipated input).
    #[error("encoding failed: {0}")]
    EncodingError(String),
}

impl CanonicalizationError {
    /// The stable error code, exactly as embedded in `reason` strings and
    /// logged by downstream tooling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidNumber(_) => "CANON_INVALID_NUMBER",
            Self::NonStringKey => "CANON_NON_STRING_KEY",
            Self::ForbiddenType => "CANON_FORBIDDEN_TYPE",
            Self::DuplicateKeyAfterNormalization => "CANON_DUPLICATE_KEY_AFTER_NORMALIZATION",
            Self::DepthExceeded(_) => "CANON_DEPTH_EXCEEDED",
            Self::EncodingError(_) => "CANON_ENCODING_ERROR",
        }
    }
}

/// Forward alias table: maps a historical code to its current replacement.
///
/// Kept in sync with [`legacy_canonicalization_code`]; the two are inverses
/// of each other for every registered rename.
pub fn resolve_canonicalization_code(code: &str) -> &str {
    match code {
        "CANON_DUPLICATE_KEY_AFTER_NORMALIZE" => "CANON_DUPLICATE_KEY_AFTER_NORMALIZATION",
        other => other,
    }
}

/// Reverse legacy map: given a current code, returns the historical code it
/// superseded, or the same code if no rename occurred.
///
/// The admission pipeline appends `(legacy: <code>)` to its rejection reason
/// only when this returns something other than the input.
pub fn legacy_canonicalization_code(code: &str) -> &str {
    match code {
        "CANON_DUPLICATE_KEY_AFTER_NORMALIZATION" => "CANON_DUPLICATE_KEY_AFTER_NORMALIZE",
        other => other,
    }
}

/// Error in cryptographic operations (used by `immune-crypto`).
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key or signature decoding failed.
    #[error("key error: {0}")]
    KeyError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_alias_round_trips() {
        assert_eq!(
            resolve_canonicalization_code("CANON_DUPLICATE_KEY_AFTER_NORMALIZE"),
            "CANON_DUPLICATE_KEY_AFTER_NORMALIZATION"
        );
        assert_eq!(
            legacy_canonicalization_code("CANON_DUPLICATE_KEY_AFTER_NORMALIZATION"),
            "CANON_DUPLICATE_KEY_AFTER_NORMALIZE"
        );
    }

    #[test]
    fn unrenamed_codes_have_no_legacy_form() {
        assert_eq!(
            legacy_canonicalization_code("CANON_INVALID_NUMBER"),
            "CANON_INVALID_NUMBER"
        );
    }

    #[test]
    fn code_strings_match_the_public_contract() {
        assert_eq!(CanonicalizationError::InvalidNumber(f64::NAN).code(), "CANON_INVALID_NUMBER");
        assert_eq!(CanonicalizationError::NonStringKey.code(), "CANON_NON_STRING_KEY");
        assert_eq!(CanonicalizationError::ForbiddenType.code(), "CANON_FORBIDDEN_TYPE");
        assert_eq!(
            CanonicalizationError::DuplicateKeyAfterNormalization.code(),
            "CANON_DUPLICATE_KEY_AFTER_NORMALIZATION"
        );
        assert_eq!(CanonicalizationError::DepthExceeded(64).code(), "CANON_DEPTH_EXCEEDED");
    }
}
