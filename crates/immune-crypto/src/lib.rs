//! # immune-crypto — Signature Verification
//!
//! Provides Ed25519 verification of a digest, given a hex-encoded public
//! key and a base64url-encoded signature. This is the only cryptographic
//! primitive the pipeline needs — hashing itself lives in
//! `immune-core::digest` alongside the canonicalizer it depends on.
//!
//! ## Crate Policy
//!
//! - No mocking of cryptographic operations in tests — all tests use real
//!   Ed25519 keys and real signatures.
//! - `verify()` never panics and never returns `Err`; malformed input is
//!   indistinguishable from a failed verification.

pub mod ed25519;

pub use ed25519::verify;
