//! HTTP DTOs for the onboarding endpoints.
//!
//! Identifier fields arrive as plain strings and are parsed in the
//! handlers, so a malformed campaign or user id turns into a 400 with a
//! readable message instead of a deserialization error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::application::handlers::onboarding::{
    GetStatusResult, StartOrResumeResult, SubmitAnswerResult,
};
use crate::domain::catalog::FieldDefinition;
use crate::domain::flow::AnswerRecord;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start or resume a flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub campaign_id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Request to submit one turn's answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub campaign_id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub field_key: String,
    pub field_value: String,
}

/// Query parameters for the status endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub campaign_id: String,
    pub user_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response to a start/resume call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub fields: Vec<FieldDefinition>,
    pub completed_fields: Vec<String>,
    pub next_field: Option<FieldDefinition>,
    pub is_completed: bool,
    pub existing_responses: Vec<AnswerRecord>,
}

impl From<StartOrResumeResult> for StartResponse {
    fn from(result: StartOrResumeResult) -> Self {
        Self {
            fields: result.fields,
            completed_fields: sorted_keys(&result.state.answered_keys),
            next_field: result.state.next_field,
            is_completed: result.state.completed,
            existing_responses: result.existing,
        }
    }
}

/// Response to a stored answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub stored: AnswerRecord,
    pub is_completed: bool,
    pub next_field: Option<FieldDefinition>,
    pub completed_fields: Vec<String>,
    pub total_fields: usize,
}

impl From<SubmitAnswerResult> for SubmitAnswerResponse {
    fn from(result: SubmitAnswerResult) -> Self {
        Self {
            stored: result.stored,
            is_completed: result.completed,
            next_field: result.next_field,
            completed_fields: sorted_keys(&result.answered_keys),
            total_fields: result.total_fields,
        }
    }
}

/// Progress counts for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressCounts {
    pub completed: usize,
    pub total: usize,
}

/// Response to a status query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub responses: Vec<AnswerRecord>,
    pub fields: Vec<FieldDefinition>,
    pub completed_fields: Vec<String>,
    pub is_completed: bool,
    pub next_field: Option<FieldDefinition>,
    pub progress: ProgressCounts,
}

impl From<GetStatusResult> for StatusResponse {
    fn from(result: GetStatusResult) -> Self {
        let (completed, total) = result.progress;
        Self {
            responses: result.responses,
            fields: result.fields,
            completed_fields: sorted_keys(&result.state.answered_keys),
            is_completed: result.state.completed,
            next_field: result.state.next_field,
            progress: ProgressCounts { completed, total },
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

fn sorted_keys(keys: &BTreeSet<String>) -> Vec<String> {
    keys.iter().cloned().collect()
}
