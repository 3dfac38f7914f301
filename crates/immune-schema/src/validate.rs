//! # Schema Validation
//!
//! Compiles a JSON-Schema (Draft 2020-12) document once at construction
//! and validates envelopes against it. When an envelope fails validation
//! in more than one place, the **first** error — ordered by JSON Pointer
//! path, lexicographic over `/`-joined path segments — is the one
//! surfaced to the pipeline. This ordering is deterministic across runs:
//! the `jsonschema` crate does not guarantee an error iteration order on
//! its own, so this module re-sorts before picking one.
//!
//! ## Security Invariant
//!
//! Schema validation is a trust boundary — it runs before canonicalization
//! and before any policy decision, so a hostile payload that doesn't even
//! match the envelope shape never reaches the signature verifier.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Error loading or compiling a schema document.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("schema document failed to compile: {0}")]
    CompileFailed(String),
}

/// A compiled JSON-Schema Draft 2020-12 validator.
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a validator from a JSON-Schema document already in memory.
    pub fn new(schema: &serde_json::Value) -> Result<Self, SchemaLoadError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaLoadError::CompileFailed(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Load and compile a validator from a JSON-Schema document on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let text = fs::read_to_string(path)?;
        let schema: serde_json::Value = serde_json::from_str(&text)?;
        Self::new(&schema)
    }

    /// Validate an envelope, returning the first error message (ordered by
    /// JSON Pointer path) if any, or `None` if the envelope conforms.
    pub fn validate(&self, envelope: &serde_json::Value) -> Option<String> {
        let mut errors: Vec<jsonschema::ValidationError> =
            self.validator.iter_errors(envelope).collect();
        if errors.is_empty() {
            return None;
        }
        errors.sort_by(|a, b| a.instance_path.to_string().cmp(&b.instance_path.to_string()));
        let first = &errors[0];
        Some(format!("{} (at {})", first, first.instance_path))
    }
}
