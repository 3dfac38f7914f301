//! # `serve` Subcommand
//!
//! Loads a `DeploymentConfig` from YAML, builds the admission pipeline and
//! an `InMemoryTransport`, and runs the Axum HTTP adapter on a single
//! Tokio runtime. A real broker-backed `Transport` is an external
//! collaborator — wiring one in is left to the deployment, not this CLI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use immune_api::{router, AppState, DeploymentConfig, InMemoryTransport, Transport};
use immune_pipeline::AdmissionPipeline;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to a YAML deployment configuration file.
    #[arg(long)]
    pub config: PathBuf,

    /// Address to bind the HTTP listener to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen: String,
}

pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(args))
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = DeploymentConfig::from_file(&args.config)?;

    let pipeline = Arc::new(AdmissionPipeline::new(
        &config.envelope.schema_path,
        &config.immune.ruleset_path,
        config.envelope.max_payload_bytes,
    )?);
    let transport: Arc<dyn Transport> = Arc::new(InMemoryTransport::default());
    let state = AppState::new(
        pipeline,
        transport,
        config.immune.accepted_subject.clone(),
        config.immune.quarantine_subject.clone(),
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    tracing::info!(address = %args.listen, "admission core listening");
    axum::serve(listener, app).await?;
    Ok(())
}
