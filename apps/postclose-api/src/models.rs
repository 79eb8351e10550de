//! Request and response models for the verification API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ComplianceMode, ComplianceVerdict, ReferenceScript, Thresholds};

/// Body for `POST /api/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    /// Post-close transcript segment, already speaker- and time-bounded
    pub transcript: String,
    pub script: ReferenceScript,
    pub mode: ComplianceMode,
    /// Agency-level thresholds; defaults apply when omitted
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// Response for `POST /api/verify`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub verdict: ComplianceVerdict,
    pub mode: ComplianceMode,
    pub analyzed_at: DateTime<Utc>,
}
