//! # immune CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Admission core — schema, canonicalization, signature, and ruleset
/// gatekeeping for inter-agent messages.
#[derive(Parser, Debug)]
#[command(name = "immune", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Evaluate one envelope against a schema and ruleset, offline.
    Check(immune_cli::check::CheckArgs),
    /// Generate an Ed25519 test signing key.
    Keygen(immune_cli::signing::KeygenArgs),
    /// Sign an envelope's canonical input with a test signing key.
    Sign(immune_cli::signing::SignArgs),
    /// Run the HTTP admission server.
    Serve(immune_cli::serve::ServeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => immune_cli::check::run(args),
        Commands::Keygen(args) => immune_cli::signing::run_keygen(args),
        Commands::Sign(args) => immune_cli::signing::run_sign(args),
        Commands::Serve(args) => immune_cli::serve::run(args),
    }
}
