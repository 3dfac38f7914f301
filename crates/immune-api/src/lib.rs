//! # immune-api — HTTP Adapter for the Admission Core
//!
//! A thin Axum/Tower/Tokio shell around `immune-pipeline`: one route,
//! `POST /v1/submit`, that maps admission decisions to an HTTP status.
//! Configuration loading (`DeploymentConfig`) and the
//! `Transport` trait boundary live here too — both are explicitly out of
//! scope for the core itself.
//!
//! ## Crate Policy
//!
//! - No business logic beyond request/response plumbing — admission
//!   decisions are entirely the pipeline's responsibility.
//! - Initializes the `tracing` subscriber (binaries only, see `immune-cli`)
//!   — never call `tracing_subscriber::fmt().init()` from library code
//!   that might be linked into a larger binary.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod transport;

pub use config::DeploymentConfig;
pub use error::AppError;
pub use routes::router;
pub use state::AppState;
pub use transport::{InMemoryTransport, PublishAck, Transport};
