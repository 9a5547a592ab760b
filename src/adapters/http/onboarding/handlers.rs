//! HTTP handlers for the onboarding endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::onboarding::{
    GetStatusHandler, GetStatusQuery, StartOrResumeCommand, StartOrResumeHandler,
    SubmitAnswerCommand, SubmitAnswerHandler,
};
use crate::domain::flow::OnboardingError;
use crate::domain::foundation::{CampaignId, UserId};

use super::dto::{
    ErrorResponse, StartRequest, StartResponse, StatusQuery, StatusResponse,
    SubmitAnswerRequest, SubmitAnswerResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct OnboardingHandlers {
    start_handler: Arc<StartOrResumeHandler>,
    submit_handler: Arc<SubmitAnswerHandler>,
    status_handler: Arc<GetStatusHandler>,
}

impl OnboardingHandlers {
    pub fn new(
        start_handler: Arc<StartOrResumeHandler>,
        submit_handler: Arc<SubmitAnswerHandler>,
        status_handler: Arc<GetStatusHandler>,
    ) -> Self {
        Self {
            start_handler,
            submit_handler,
            status_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/onboarding/start - Start or resume a flow
pub async fn start(
    State(handlers): State<OnboardingHandlers>,
    Json(req): Json<StartRequest>,
) -> Response {
    let (campaign_id, user_id) = match parse_ids(&req.campaign_id, &req.user_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = StartOrResumeCommand {
        campaign_id,
        user_id,
        username: req.username,
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => {
            let response: StartResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_onboarding_error(e),
    }
}

/// PUT /api/onboarding/answer - Submit one turn's answer
pub async fn submit_answer(
    State(handlers): State<OnboardingHandlers>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Response {
    let (campaign_id, user_id) = match parse_ids(&req.campaign_id, &req.user_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = SubmitAnswerCommand {
        campaign_id,
        user_id,
        username: req.username,
        field_key: req.field_key,
        field_value: req.field_value,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => {
            let response: SubmitAnswerResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_onboarding_error(e),
    }
}

/// GET /api/onboarding/status - Progress snapshot for one user
pub async fn status(
    State(handlers): State<OnboardingHandlers>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let (campaign_id, user_id) = match parse_ids(&query.campaign_id, &query.user_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let query = GetStatusQuery {
        campaign_id,
        user_id,
    };

    match handlers.status_handler.handle(query).await {
        Ok(result) => {
            let response: StatusResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_onboarding_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_ids(campaign_id: &str, user_id: &str) -> Result<(CampaignId, UserId), Response> {
    let campaign_id = campaign_id.parse::<CampaignId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid campaign ID")),
        )
            .into_response()
    })?;

    let user_id = UserId::new(user_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid user ID")),
        )
            .into_response()
    })?;

    Ok((campaign_id, user_id))
}

fn handle_onboarding_error(error: OnboardingError) -> Response {
    match &error {
        OnboardingError::UnknownField { .. } | OnboardingError::ValidationFailed { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message())),
        )
            .into_response(),
        OnboardingError::Infrastructure(detail) => {
            // Full context for operators; the user gets a generic message.
            tracing::error!(error = %detail, "onboarding storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Something went wrong")),
            )
                .into_response()
        }
    }
}
