//! # Ed25519 Signature Verification
//!
//! Implements the Signature Verifier component: `verify(source_agent_hex,
//! digest, signature_b64url) -> bool`. Never throws — any malformed input
//! (bad hex, bad base64url, a cryptographically invalid signature) simply
//! returns `false`. This mirrors the admission pipeline's requirement that
//! a hostile or corrupt envelope can only ever produce a rejection, never
//! a panic or propagated error.
//!
//! ## Security Invariant
//!
//! The message verified is always a digest over canonical bytes, never raw
//! envelope bytes — callers in `immune-pipeline` are the only place this
//! function is invoked, and they always pass `immune_core::hash(...)`
//! output.

use base64::Engine as _;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Verify an Ed25519 signature over a digest, given a hex-encoded public
/// key and a base64url-encoded (padding optional) signature.
///
/// Returns `false` — never an error — for any decode or cryptographic
/// failure:
/// - `source_agent_hex` that isn't exactly 64 hex characters (32 bytes).
/// - `signature_b64url` that doesn't decode to exactly 64 bytes.
/// - a structurally valid signature that doesn't verify against `digest`.
pub fn verify(source_agent_hex: &str, digest: &[u8], signature_b64url: &str) -> bool {
    let Some(public_key_bytes) = hex_decode_32(source_agent_hex) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key_bytes) else {
        return false;
    };
    let Some(signature_bytes) = decode_b64url_signature(signature_b64url) else {
        return false;
    };
    let signature = Signature::from_bytes(&signature_bytes);
    verifying_key.verify(digest, &signature).is_ok()
}

fn hex_decode_32(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 {
        return None;
    }
    let mut bytes = [0u8; 32];
    for i in 0..32 {
        bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(bytes)
}

/// Decode base64url, tolerating missing padding by padding to a multiple
/// of 4 with `=` before decoding.
fn decode_b64url_signature(input: &str) -> Option<[u8; 64]> {
    let mut padded = input.to_string();
    let remainder = padded.len() % 4;
    if remainder != 0 {
        padded.push_str(&"=".repeat(4 - remainder));
    }
    let decoded = base64::engine::general_purpose::URL_SAFE
        .decode(padded.as_bytes())
        .ok()?;
    decoded.try_into().ok()
}
