//! HTTP adapters - REST API implementations.
//!
//! The turn-based onboarding surface lives under `/api/onboarding`; the
//! wizard's batch surface is consumed in-process and has no routes here.

mod health;
pub mod onboarding;

pub use health::health_routes;
pub use onboarding::{onboarding_routes, OnboardingHandlers};
