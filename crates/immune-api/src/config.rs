//! # Deployment Configuration
//!
//! `DeploymentConfig` is the YAML-loaded configuration surface: transport
//! target/timeout, ruleset and schema paths, the quarantine subject, and
//! the payload size ceiling. None of this lives
//! in the core crates — the pipeline and ruleset crates only ever see
//! already-resolved paths and integers, never a config file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    pub target: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImmuneConfig {
    pub ruleset_path: String,
    pub quarantine_subject: String,
    #[serde(default = "default_accepted_subject")]
    pub accepted_subject: String,
}

fn default_accepted_subject() -> String {
    "admitted".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeConfig {
    pub schema_path: String,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    pub transport: TransportConfig,
    pub immune: ImmuneConfig,
    pub envelope: EnvelopeConfig,
}

impl DeploymentConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_deployment_config() {
        let yaml = r#"
transport:
  target: "unix:///var/run/broker.sock"
  timeout_ms: 5000
immune:
  ruleset_path: "/etc/immune/ruleset.json"
  quarantine_subject: "quarantine.events"
envelope:
  schema_path: "/etc/immune/envelope.schema.json"
  max_payload_bytes: 1048576
"#;
        let config = DeploymentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.transport.timeout_ms, 5000);
        assert_eq!(config.immune.quarantine_subject, "quarantine.events");
        assert_eq!(config.envelope.max_payload_bytes, 1_048_576);
        assert_eq!(config.immune.accepted_subject, "admitted");
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(DeploymentConfig::from_yaml_str("not: [valid").is_err());
    }
}
