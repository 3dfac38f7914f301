//! # Content Digest — Fixed-Width Hash of Canonical Bytes
//!
//! Defines `ContentDigest` and `DigestAlgorithm`, produced exclusively from
//! [`CanonicalBytes`](crate::canonical::CanonicalBytes) so that every digest
//! in the system flows through the canonicalization pipeline.
//!
//! ## Algorithm Selection
//!
//! BLAKE3-256 is preferred (enabled by the `blake3` feature, on by default).
//! When the feature is disabled — the only supported way to "not have
//! BLAKE3 available at build time" in a statically linked binary — SHA-256
//! is used instead. There is no runtime fallback: a deployment either has
//! the feature compiled in or it doesn't, and every instance in a fleet
//! must agree, since the digest is the downstream content address.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::canonical::CanonicalBytes;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// BLAKE3-256 — preferred when the `blake3` feature is enabled.
    Blake3,
    /// SHA-256 — fallback when BLAKE3 is unavailable.
    Sha256,
}

impl DigestAlgorithm {
    /// The algorithm this build actually uses.
    pub const fn active() -> Self {
        #[cfg(feature = "blake3")]
        {
            DigestAlgorithm::Blake3
        }
        #[cfg(not(feature = "blake3"))]
        {
            DigestAlgorithm::Sha256
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DigestAlgorithm::Blake3 => "blake3",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

/// A content-addressed digest with its algorithm tag.
///
/// The 32-byte digest and algorithm tag together form a self-describing
/// content identifier that survives a fleet migrating between algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    pub algorithm: DigestAlgorithm,
    pub bytes: [u8; 32],
}

impl ContentDigest {
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm.label(), self.to_hex())
    }
}

/// Hash canonical bytes into a 32-byte digest using the active algorithm.
pub fn hash(bytes: &CanonicalBytes) -> ContentDigest {
    ContentDigest::new(DigestAlgorithm::active(), hash_raw(bytes.as_bytes()))
}

/// Raw 32-byte digest of arbitrary bytes, using the active algorithm.
///
/// Exposed separately from [`hash`] for the signature verifier, which
/// hashes already-canonical bytes but receives them as a plain `&[u8]`
/// from the HTTP/CLI boundary.
#[cfg(feature = "blake3")]
pub fn hash_raw(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}

#[cfg(not(feature = "blake3"))]
pub fn hash_raw(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::value::Value;

    #[test]
    fn digest_is_32_bytes_and_deterministic() {
        let value = Value::Mapping(vec![("a".to_string(), Value::Int(1))]);
        let bytes = canonicalize(&value).unwrap();
        let a = hash(&bytes);
        let b = hash(&bytes);
        assert_eq!(a.bytes.len(), 32);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_canonical_bytes_produce_distinct_digests() {
        let a = canonicalize(&Value::Int(1)).unwrap();
        let b = canonicalize(&Value::Int(2)).unwrap();
        assert_ne!(hash(&a), hash(&b));
    }

    #[test]
    fn active_algorithm_matches_the_enabled_feature() {
        #[cfg(feature = "blake3")]
        assert_eq!(DigestAlgorithm::active(), DigestAlgorithm::Blake3);
        #[cfg(not(feature = "blake3"))]
        assert_eq!(DigestAlgorithm::active(), DigestAlgorithm::Sha256);
    }

    #[test]
    fn to_hex_round_trips_through_display() {
        let digest = ContentDigest::new(DigestAlgorithm::Sha256, [0u8; 32]);
        assert_eq!(digest.to_hex(), "0".repeat(64));
        assert_eq!(digest.to_string(), format!("sha256:{}", "0".repeat(64)));
    }
}
