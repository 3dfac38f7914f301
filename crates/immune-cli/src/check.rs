//! # `check` Subcommand
//!
//! Runs a single envelope file through the admission pipeline offline —
//! no transport, no server — and prints the resulting decision as JSON.
//! Intended for CI gating and for debugging rejected envelopes captured
//! from a quarantine subject.

use std::path::PathBuf;

use clap::Args;

use immune_pipeline::AdmissionPipeline;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the envelope JSON document to evaluate.
    #[arg(long)]
    pub envelope: PathBuf,

    /// Path to the JSON Schema (Draft 2020-12) the envelope must satisfy.
    #[arg(long)]
    pub schema: PathBuf,

    /// Path to the ruleset JSON document.
    #[arg(long)]
    pub ruleset: PathBuf,

    /// Maximum accepted serialized envelope size, in bytes.
    #[arg(long, default_value_t = 1_048_576)]
    pub max_payload_bytes: usize,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let pipeline = AdmissionPipeline::new(&args.schema, &args.ruleset, args.max_payload_bytes)?;

    let raw_text = std::fs::read_to_string(&args.envelope)?;
    let raw: serde_json::Value = serde_json::from_str(&raw_text)?;

    let decision = pipeline.evaluate(&raw);
    let output = serde_json::json!({
        "accepted": decision.accepted,
        "reason": decision.reason,
        "canonical_bytes_len": decision.canonical_bytes.len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !decision.accepted {
        std::process::exit(1);
    }
    Ok(())
}
