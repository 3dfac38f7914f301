//! # immune-schema — Structural Envelope Validation
//!
//! Wraps the `jsonschema` crate's Draft 2020-12 support behind a
//! `SchemaValidator` that compiles once at construction and reports a
//! single, deterministically chosen error on failure.
//!
//! ## Crate Policy
//!
//! - Operates on plain `serde_json::Value` — the schema validator runs
//!   before canonicalization, on the raw envelope as submitted, so it has
//!   no dependency on `immune-core`'s generic value model.

pub mod validate;

pub use validate::{SchemaLoadError, SchemaValidator};
