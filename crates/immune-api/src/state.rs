//! # Application State
//!
//! Shared state for the Axum application: the admission pipeline and the
//! transport used to publish accepted envelopes and route rejected ones
//! to quarantine.

use std::sync::Arc;

use immune_pipeline::AdmissionPipeline;

use crate::transport::Transport;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AdmissionPipeline>,
    pub transport: Arc<dyn Transport>,
    pub accepted_subject: String,
    pub quarantine_subject: String,
}

impl AppState {
    pub fn new(
        pipeline: Arc<AdmissionPipeline>,
        transport: Arc<dyn Transport>,
        accepted_subject: impl Into<String>,
        quarantine_subject: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            transport,
            accepted_subject: accepted_subject.into(),
            quarantine_subject: quarantine_subject.into(),
        }
    }
}
