//! HTTP handlers for the verification API

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{VerifyRequest, VerifyResponse};
use crate::state::AppState;

/// Transcripts are single post-close segments, seconds to low minutes of
/// speech; anything larger is a caller bug, not a real segment.
const MAX_TRANSCRIPT_BYTES: usize = 512 * 1024;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Verify a post-close transcript segment against a reference script
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if req.transcript.len() > MAX_TRANSCRIPT_BYTES {
        return Err(ApiError::InvalidRequest(format!(
            "Transcript exceeds {} byte limit",
            MAX_TRANSCRIPT_BYTES
        )));
    }

    let verdict = state
        .engine
        .verify(&req.transcript, &req.script, req.mode, &req.thresholds)?;

    tracing::info!(
        compliance_passed = verdict.compliance_passed,
        overall_score = verdict.overall_score,
        flagged_for_review = verdict.flagged_for_review,
        "verified post-close segment"
    );

    Ok(Json(VerifyResponse {
        verdict,
        mode: req.mode,
        analyzed_at: Utc::now(),
    }))
}
