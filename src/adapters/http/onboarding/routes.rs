//! HTTP routes for the onboarding endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{start, status, submit_answer, OnboardingHandlers};

/// Creates the onboarding router with all endpoints.
pub fn onboarding_routes(handlers: OnboardingHandlers) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/answer", put(submit_answer))
        .route("/status", get(status))
        .with_state(handlers)
}
