//! HTTP surface for the turn-based onboarding flow.

mod dto;
mod handlers;
mod routes;

pub use handlers::OnboardingHandlers;
pub use routes::onboarding_routes;
