//! # immune-pipeline — The Admission Pipeline
//!
//! Composes the Schema Validator, Canonicalizer, Hasher, Signature
//! Verifier, and Ruleset into a single `AdmissionPipeline::evaluate()`
//! call. Stage ordering is strict and short-circuits on first failure:
//!
//! 1. Schema validation against the raw envelope.
//! 2. A `max_payload_bytes` size precheck against the serialized envelope.
//! 3. Canonicalization of `{header, meta, payload}`.
//! 4. Hashing of the canonical bytes.
//! 5. Ed25519 signature verification over the hash.
//! 6. Ruleset evaluation.
//!
//! Each stage's failure mode carries its own reason-string and
//! canonical-bytes-retention contract; see [`AdmissionDecision`].
//!
//! ## Security Invariant
//!
//! Schema and size checks run before any cryptographic work (cheap
//! rejection of malformed input first); signature verification runs
//! before ruleset evaluation so that policy structure is never exercised
//! for an unauthenticated envelope.

use std::path::Path;

use serde_json::Value as JsonValue;
use thiserror::Error;

use immune_core::canonical::canonicalize;
use immune_core::error::{legacy_canonicalization_code, CanonicalizationError};
use immune_core::{digest, Envelope, Value};
use immune_ruleset::{Ruleset, RulesetLoadError};
use immune_schema::{SchemaLoadError, SchemaValidator};

/// Error constructing an `AdmissionPipeline` — these are one-time,
/// construction-only failures, never surfaced through `AdmissionDecision`.
#[derive(Error, Debug)]
pub enum PipelineInitError {
    #[error("schema: {0}")]
    Schema(#[from] SchemaLoadError),

    #[error("ruleset: {0}")]
    Ruleset(#[from] RulesetLoadError),
}

/// The outcome of one admission attempt.
///
/// `canonical_bytes` is empty when canonicalization itself failed, or when
/// schema validation or the size precheck rejected the envelope before
/// canonicalization ever ran. It is populated (even on rejection) once
/// canonicalization has succeeded, so the quarantine channel can preserve
/// a stable identity for the rejected event.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionDecision {
    pub accepted: bool,
    pub reason: String,
    pub canonical_bytes: Vec<u8>,
}

impl AdmissionDecision {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
            canonical_bytes: Vec::new(),
        }
    }

    fn rejected_with_bytes(reason: impl Into<String>, canonical_bytes: Vec<u8>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
            canonical_bytes,
        }
    }

    fn accepted(canonical_bytes: Vec<u8>) -> Self {
        Self {
            accepted: true,
            reason: String::new(),
            canonical_bytes,
        }
    }
}

/// The composed admission pipeline.
///
/// Owns the compiled schema and the loaded ruleset for its lifetime; both
/// are stateless given their construction inputs, so `evaluate()` is a
/// pure function safe to call concurrently from multiple worker threads.
pub struct AdmissionPipeline {
    schema: SchemaValidator,
    ruleset: Ruleset,
    max_payload_bytes: usize,
}

impl AdmissionPipeline {
    /// Load the schema and ruleset once from disk and construct a pipeline.
    pub fn new(
        schema_path: impl AsRef<Path>,
        ruleset_path: impl AsRef<Path>,
        max_payload_bytes: usize,
    ) -> Result<Self, PipelineInitError> {
        Ok(Self {
            schema: SchemaValidator::from_file(schema_path)?,
            ruleset: Ruleset::from_file(ruleset_path)?,
            max_payload_bytes,
        })
    }

    /// Construct a pipeline from an already-compiled schema and ruleset —
    /// used by tests and by callers that load configuration themselves.
    pub fn from_parts(schema: SchemaValidator, ruleset: Ruleset, max_payload_bytes: usize) -> Self {
        Self {
            schema,
            ruleset,
            max_payload_bytes,
        }
    }

    /// Evaluate a raw JSON envelope against every admission stage in order.
    pub fn evaluate(&self, raw: &JsonValue) -> AdmissionDecision {
        let header_type = raw
            .get("header")
            .and_then(|h| h.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("unknown");

        if let Some(error) = self.schema.validate(raw) {
            let decision = AdmissionDecision::rejected(format!("schema validation failed: {error}"));
            tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
            return decision;
        }

        let serialized_len = serde_json::to_vec(raw).map(|b| b.len()).unwrap_or(usize::MAX);
        if serialized_len > self.max_payload_bytes {
            let decision = AdmissionDecision::rejected(format!(
                "payload exceeds max_payload_bytes: {serialized_len} > {}",
                self.max_payload_bytes
            ));
            tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
            return decision;
        }

        let envelope = Envelope::new(Value::from(raw.clone()));
        let canonical_input = match envelope.canonical_input() {
            Ok(input) => input,
            Err(missing) => {
                // Should not occur: the schema validated above requires both
                // `header` and `payload`. Fail closed rather than panic.
                let error = CanonicalizationError::EncodingError(missing.to_string());
                let decision = AdmissionDecision::rejected(canonicalization_failure_reason(&error));
                tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
                return decision;
            }
        };
        let canonical_bytes = match canonicalize(&canonical_input) {
            Ok(bytes) => bytes,
            Err(error) => {
                let decision = AdmissionDecision::rejected(canonicalization_failure_reason(&error));
                tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
                return decision;
            }
        };

        let content_digest = digest::hash(&canonical_bytes);
        let source_agent = envelope.source_agent().unwrap_or_default();
        let signature = envelope.signature().unwrap_or_default();
        if !immune_crypto::verify(&source_agent, &content_digest.bytes, &signature) {
            let decision = AdmissionDecision::rejected_with_bytes(
                "signature verification failed",
                canonical_bytes.as_bytes().to_vec(),
            );
            tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
            return decision;
        }

        let (ok, inner_reason) = self.ruleset.validate(&envelope);
        if !ok {
            let decision = AdmissionDecision::rejected_with_bytes(
                format!("ruleset validation failed: {inner_reason}"),
                canonical_bytes.as_bytes().to_vec(),
            );
            tracing::warn!(r#type = header_type, reason = %decision.reason, "envelope rejected");
            return decision;
        }

        tracing::info!(r#type = header_type, digest = %content_digest, "envelope admitted");
        AdmissionDecision::accepted(canonical_bytes.as_bytes().to_vec())
    }
}

fn canonicalization_failure_reason(error: &CanonicalizationError) -> String {
    let code = error.code();
    let legacy = legacy_canonicalization_code(code);
    if legacy != code {
        format!("canonicalization failed: {code} (legacy: {legacy})")
    } else {
        format!("canonicalization failed: {code}")
    }
}

/// Select the best-available byte form of a rejected envelope for the
/// quarantine channel.
///
/// 1. If `canonical_bytes` is non-empty, it is returned verbatim — the
///    best case, where canonicalization already succeeded during
///    admission.
/// 2. Otherwise, attempt to canonicalize `canonical_input(envelope)` —
///    the envelope may be schema-rejected but still has both `header`
///    and `payload`, so it's still structurally canonicalizable. This
///    step genuinely fails (and falls through) when either region is
///    missing, not just when canonicalization itself errors.
/// 3. Otherwise, fall back to canonicalizing the whole envelope value
///    as submitted (including `signature`, unlike the hashed triple).
/// 4. If that also fails, the error propagates.
pub fn serialize_for_quarantine(
    raw: &JsonValue,
    canonical_bytes: &[u8],
) -> Result<Vec<u8>, CanonicalizationError> {
    if !canonical_bytes.is_empty() {
        return Ok(canonical_bytes.to_vec());
    }

    let envelope = Envelope::new(Value::from(raw.clone()));
    if let Ok(input) = envelope.canonical_input() {
        if let Ok(bytes) = canonicalize(&input) {
            return Ok(bytes.as_bytes().to_vec());
        }
    }

    let whole = canonicalize(&Value::from(raw.clone()))?;
    Ok(whole.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;

    fn base_schema() -> serde_json::Value {
        serde_json::json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["header", "payload", "signature"],
            "properties": {
                "header": {
                    "type": "object",
                    "required": ["id", "timestamp", "source_agent", "type", "version"]
                },
                "payload": {},
                "signature": {"type": "string"}
            }
        })
    }

    fn pipeline_with(ruleset: Ruleset) -> AdmissionPipeline {
        let schema = SchemaValidator::new(&base_schema()).unwrap();
        AdmissionPipeline::from_parts(schema, ruleset, 1_000_000)
    }

    fn hex_encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn signed_envelope(signing_key: &SigningKey, header_type: &str, security_level: &str) -> serde_json::Value {
        let public_hex = hex_encode(&signing_key.verifying_key().to_bytes());
        let raw = serde_json::json!({
            "header": {
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "timestamp": 1,
                "source_agent": public_hex,
                "type": header_type,
                "version": "1"
            },
            "meta": {"security_level": security_level},
            "payload": {"x": 1, "y": 2},
            "signature": ""
        });

        let envelope = Envelope::new(Value::from(raw.clone()));
        let canonical = canonicalize(&envelope.canonical_input().unwrap()).unwrap();
        let content_digest = digest::hash(&canonical);
        let signature = signing_key.sign(&content_digest.bytes);
        let signature_b64 =
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature.to_bytes());

        let mut raw = raw;
        raw["signature"] = serde_json::Value::String(signature_b64);
        raw
    }

    #[test]
    fn accepts_a_correctly_signed_envelope() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let pipeline = pipeline_with(Ruleset::new(Default::default(), Default::default()));
        let raw = signed_envelope(&signing_key, "state.mutation", "confidential");
        let decision = pipeline.evaluate(&raw);
        assert!(decision.accepted, "{}", decision.reason);
        assert!(!decision.canonical_bytes.is_empty());
    }

    #[test]
    fn rejects_tampered_signature_but_retains_canonical_bytes() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let pipeline = pipeline_with(Ruleset::new(Default::default(), Default::default()));
        let mut raw = signed_envelope(&signing_key, "state.mutation", "confidential");
        raw["signature"] = serde_json::Value::String(
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([0u8; 64]),
        );
        let decision = pipeline.evaluate(&raw);
        assert!(!decision.accepted);
        assert!(decision.reason.contains("signature verification failed"));
        assert!(!decision.canonical_bytes.is_empty());
    }

    #[test]
    fn rejects_missing_header_type_without_canonical_bytes() {
        let pipeline = pipeline_with(Ruleset::new(Default::default(), Default::default()));
        let raw = serde_json::json!({
            "header": {
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "timestamp": 1,
                "source_agent": "ab".repeat(32)
            },
            "payload": {"x": 1},
            "signature": "sig"
        });
        let decision = pipeline.evaluate(&raw);
        assert!(!decision.accepted);
        assert!(decision.reason.starts_with("schema validation failed"));
        assert!(decision.canonical_bytes.is_empty());
    }

    #[test]
    fn rejects_nan_payload_with_the_invalid_number_code() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let pipeline = pipeline_with(Ruleset::new(Default::default(), Default::default()));
        let mut raw = signed_envelope(&signing_key, "state.mutation", "confidential");
        raw["payload"] = serde_json::json!({"value": f64::NAN});
        let decision = pipeline.evaluate(&raw);
        assert!(!decision.accepted);
        assert!(decision.reason.ends_with("CANON_INVALID_NUMBER"));
    }

    #[test]
    fn quarantine_fallback_canonicalizes_the_whole_malformed_envelope() {
        // Neither `header` nor `payload` is present, so step 2 of
        // `serialize_for_quarantine` must fail and fall through to step 3,
        // which canonicalizes the envelope as submitted — `signature`
        // included, since step 2's `{header, meta, payload}` triple would
        // have dropped it.
        let raw = serde_json::json!({
            "meta": {"correlation_id": "c1"},
            "signature": "sig"
        });
        let bytes = serialize_for_quarantine(&raw, &[]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["meta"]["correlation_id"], "c1");
        assert_eq!(parsed["signature"], "sig");
        assert_eq!(parsed, raw);
    }

    #[test]
    fn quarantine_fallback_uses_the_triple_when_header_and_payload_are_both_present() {
        // Here step 2 succeeds, so `signature` must be dropped — the
        // output is the `{header, meta, payload}` triple, not the whole
        // envelope.
        let raw = serde_json::json!({
            "header": {"type": "t"},
            "payload": {"x": 1},
            "signature": "sig"
        });
        let bytes = serialize_for_quarantine(&raw, &[]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(parsed.get("signature").is_none());
        assert_eq!(parsed["header"]["type"], "t");
    }

    #[test]
    fn quarantine_returns_existing_canonical_bytes_verbatim() {
        let raw = serde_json::json!({"anything": true});
        let existing = b"{\"already\":\"canonical\"}".to_vec();
        let bytes = serialize_for_quarantine(&raw, &existing).unwrap();
        assert_eq!(bytes, existing);
    }

    #[test]
    fn blocked_type_is_rejected_by_ruleset_after_signature_passes() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let ruleset = Ruleset::new(["state.mutation".to_string()].into_iter().collect(), Default::default());
        let pipeline = pipeline_with(ruleset);
        let raw = signed_envelope(&signing_key, "state.mutation", "confidential");
        let decision = pipeline.evaluate(&raw);
        assert!(!decision.accepted);
        assert!(decision.reason.contains("blocked event type"));
        assert!(!decision.canonical_bytes.is_empty());
    }

    #[test]
    fn payload_over_max_bytes_is_rejected_before_canonicalization() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let schema = SchemaValidator::new(&base_schema()).unwrap();
        let pipeline = AdmissionPipeline::from_parts(schema, Ruleset::new(Default::default(), Default::default()), 10);
        let raw = signed_envelope(&signing_key, "state.mutation", "confidential");
        let decision = pipeline.evaluate(&raw);
        assert!(!decision.accepted);
        assert!(decision.reason.contains("max_payload_bytes"));
        assert!(decision.canonical_bytes.is_empty());
    }
}
