//! # immune-core — Foundational Types for the Admission Core
//!
//! This crate is the bedrock of the admission pipeline. It defines the
//! generic structured-value model, the canonicalization algorithm, content
//! digesting, and the envelope view that the rest of the workspace builds
//! on. Every other crate depends on `immune-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **One generic value type.** [`Value`] is the only structured-data
//!    type the canonicalizer ever sees. Its seven variants are exhaustive,
//!    so a non-string mapping key or an unrecognized value shape is a
//!    compile error in safe code, not a runtime check.
//!
//! 2. **`CanonicalBytes` newtype.** All digest computation flows through
//!    [`canonical::canonicalize`]. No raw `serde_json::to_vec()` for
//!    digests. This prevents divergent canonicalization by construction.
//!
//! 3. **Stable error codes.** [`error::CanonicalizationError`] carries a
//!    `code()` string embedded verbatim in rejection reasons and consumed
//!    by downstream log tooling.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `immune-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod value;

pub use canonical::{canonical_input, canonicalize, CanonicalBytes, MAX_DEPTH};
pub use digest::{hash, hash_raw, ContentDigest, DigestAlgorithm};
pub use envelope::{Envelope, MissingRegion};
pub use error::{CanonicalizationError, CryptoError};
pub use value::Value;
