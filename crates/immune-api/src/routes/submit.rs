//! # `POST /v1/submit`
//!
//! Accepts an envelope as a JSON body, runs it through the admission
//! pipeline, and publishes the result: accepted envelopes go to the
//! accepted subject, rejected ones are always attempted to the
//! quarantine subject first so operators retain an audit trail.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

use immune_pipeline::serialize_for_quarantine;

use crate::error::AppError;
use crate::state::AppState;

pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<JsonValue>,
) -> Result<impl IntoResponse, AppError> {
    let decision = state.pipeline.evaluate(&body);
    let correlation_id = correlation_id_for(&body);

    if decision.accepted {
        let ack = state
            .transport
            .publish(&decision.canonical_bytes, &state.accepted_subject, &correlation_id, true)
            .await;
        if !ack.accepted || !ack.persisted {
            return Err(AppError::ServiceUnavailable(
                ack.error_message.unwrap_or_else(|| "publish not acknowledged".to_string()),
            ));
        }
        return Ok((
            StatusCode::ACCEPTED,
            Json(serde_json::json!({
                "accepted": true,
                "stream_sequence": ack.stream_sequence,
            })),
        ));
    }

    let quarantine_bytes = serialize_for_quarantine(&body, &decision.canonical_bytes)
        .map_err(|e| AppError::ServiceUnavailable(format!("quarantine serialization failed: {e}")))?;

    let ack = state
        .transport
        .publish(&quarantine_bytes, &state.quarantine_subject, &correlation_id, true)
        .await;
    if !ack.accepted {
        return Err(AppError::ServiceUnavailable(
            ack.error_message.unwrap_or_else(|| "quarantine publish failed".to_string()),
        ));
    }

    Err(AppError::from_rejection_reason(decision.reason))
}

fn correlation_id_for(body: &JsonValue) -> String {
    body.get("meta")
        .and_then(|meta| meta.get("correlation_id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
