//! # immune-ruleset — Policy Predicate Evaluation
//!
//! A `Ruleset` is an immutable set of policy predicates loaded once at
//! startup: a denylist of blocked `header.type` values, and a map from
//! type to the `meta.security_level` required for envelopes of that type.
//!
//! ## Security Invariant
//!
//! The admission pipeline only evaluates the ruleset after signature
//! verification has succeeded — this avoids leaking policy structure
//! (which types are blocked, which security levels are required) to an
//! unauthenticated caller probing with unsigned envelopes.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use immune_core::Envelope;

/// Error loading a ruleset document.
#[derive(Error, Debug)]
pub enum RulesetLoadError {
    #[error("failed to read ruleset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("ruleset file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The on-disk shape of a ruleset document.
#[derive(Debug, Deserialize)]
struct RulesetDocument {
    #[serde(default)]
    blocked_types: HashSet<String>,
    #[serde(default)]
    required_security_level_for_types: HashMap<String, String>,
}

/// An immutable, loaded policy ruleset.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    blocked_types: HashSet<String>,
    required_security_level_for_types: HashMap<String, String>,
}

impl Ruleset {
    /// Construct a ruleset directly, without loading from disk — used by
    /// tests and by callers assembling policy programmatically.
    pub fn new(
        blocked_types: HashSet<String>,
        required_security_level_for_types: HashMap<String, String>,
    ) -> Self {
        Self {
            blocked_types,
            required_security_level_for_types,
        }
    }

    /// Load a ruleset from a JSON document on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesetLoadError> {
        let text = fs::read_to_string(path)?;
        let doc: RulesetDocument = serde_json::from_str(&text)?;
        Ok(Self {
            blocked_types: doc.blocked_types,
            required_security_level_for_types: doc.required_security_level_for_types,
        })
    }

    /// Evaluate the ruleset against an envelope.
    ///
    /// Returns `(true, "")` when the envelope passes every predicate, or
    /// `(false, reason)` on the first predicate that fails.
    pub fn validate(&self, envelope: &Envelope) -> (bool, String) {
        let header_type = envelope.header_type().unwrap_or_default();

        if self.blocked_types.contains(&header_type) {
            return (false, "blocked event type".to_string());
        }

        if let Some(required) = self.required_security_level_for_types.get(&header_type) {
            let actual = envelope.security_level();
            if actual.as_deref() != Some(required.as_str()) {
                return (false, "security level mismatch".to_string());
            }
        }

        (true, String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use immune_core::Value;

    fn envelope(header_type: &str, security_level: Option<&str>) -> Envelope {
        let mut meta_entries = Vec::new();
        if let Some(level) = security_level {
            meta_entries.push(("security_level".to_string(), Value::String(level.to_string())));
        }
        Envelope::new(Value::Mapping(vec![
            ("header".to_string(), Value::Mapping(vec![
                ("type".to_string(), Value::String(header_type.to_string())),
            ])),
            ("meta".to_string(), Value::Mapping(meta_entries)),
            ("payload".to_string(), Value::Null),
        ]))
    }

    #[test]
    fn blocks_a_denylisted_type() {
        let ruleset = Ruleset::new(
            ["forbidden.type".to_string()].into_iter().collect(),
            HashMap::new(),
        );
        let (ok, reason) = ruleset.validate(&envelope("forbidden.type", None));
        assert!(!ok);
        assert_eq!(reason, "blocked event type");
    }

    #[test]
    fn requires_matching_security_level() {
        let mut required = HashMap::new();
        required.insert("state.mutation".to_string(), "confidential".to_string());
        let ruleset = Ruleset::new(HashSet::new(), required);

        let (ok, reason) = ruleset.validate(&envelope("state.mutation", Some("public")));
        assert!(!ok);
        assert_eq!(reason, "security level mismatch");
    }

    #[test]
    fn absent_security_level_is_treated_as_not_equal() {
        let mut required = HashMap::new();
        required.insert("state.mutation".to_string(), "confidential".to_string());
        let ruleset = Ruleset::new(HashSet::new(), required);

        let (ok, _) = ruleset.validate(&envelope("state.mutation", None));
        assert!(!ok);
    }

    #[test]
    fn passes_when_no_predicate_applies() {
        let ruleset = Ruleset::new(HashSet::new(), HashMap::new());
        let (ok, reason) = ruleset.validate(&envelope("state.mutation", None));
        assert!(ok);
        assert_eq!(reason, "");
    }

    #[test]
    fn matching_security_level_passes() {
        let mut required = HashMap::new();
        required.insert("state.mutation".to_string(), "confidential".to_string());
        let ruleset = Ruleset::new(HashSet::new(), required);

        let (ok, _) = ruleset.validate(&envelope("state.mutation", Some("confidential")));
        assert!(ok);
    }
}
