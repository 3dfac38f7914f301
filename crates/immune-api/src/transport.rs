//! # Transport — Broker Publish Contract
//!
//! `Transport` is the external collaborator that actually moves canonical
//! bytes onto a broker subject — out of scope for the admission core
//! itself (see Non-goals), but its contract shapes the HTTP status
//! mapping in [`crate::error::AppError`], so it lives here as a trait
//! boundary rather than a concrete client.

use async_trait::async_trait;

/// The result of one publish attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishAck {
    pub accepted: bool,
    pub persisted: bool,
    pub stream_sequence: Option<u64>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl PublishAck {
    pub fn ok(stream_sequence: u64) -> Self {
        Self {
            accepted: true,
            persisted: true,
            stream_sequence: Some(stream_sequence),
            error_code: None,
            error_message: None,
        }
    }

    pub fn failed(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            persisted: false,
            stream_sequence: None,
            error_code: Some(error_code.into()),
            error_message: Some(error_message.into()),
        }
    }
}

/// Publishes canonical bytes to a broker subject.
///
/// `require_persisted_ack` mirrors the external contract's default of
/// `true` — the caller (the submission endpoint) decides whether an
/// accepted-but-not-yet-persisted ack is good enough.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn publish(
        &self,
        canonical_envelope: &[u8],
        subject: &str,
        correlation_id: &str,
        require_persisted_ack: bool,
    ) -> PublishAck;
}

/// An in-memory transport stub for tests and local development.
///
/// Always accepts and persists, handing out a monotonically increasing
/// stream sequence. Never used in a real deployment — a real broker client
/// is a Non-goal of the core; production callers supply their own `Transport`.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    sequence: std::sync::atomic::AtomicU64,
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn publish(
        &self,
        _canonical_envelope: &[u8],
        _subject: &str,
        _correlation_id: &str,
        _require_persisted_ack: bool,
    ) -> PublishAck {
        let sequence = self
            .sequence
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        PublishAck::ok(sequence)
    }
}
