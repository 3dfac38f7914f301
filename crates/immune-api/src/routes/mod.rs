//! # Route Modules
//!
//! The submission endpoint is the only route surface this crate owns —
//! the other primitive routers from the wider stack this crate was
//! adapted from have no counterpart in the admission core.

pub mod submit;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// `TraceLayer` is the only middleware in the stack — the admission core
/// carries no auth, rate-limiting, or metrics layers (see Non-goals); it
/// emits one request-level span per call, independent of the per-envelope
/// `tracing::info!`/`warn!` lines `immune-pipeline` emits for the decision
/// itself.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/submit", post(submit::submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
