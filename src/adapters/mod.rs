//! Adapters - Implementations of ports plus the HTTP surface.
//!
//! - `postgres` - sqlx-backed implementations of the storage ports
//! - `memory` - in-memory implementations for tests and local development
//! - `http` - axum routes for the turn-based onboarding surface

pub mod http;
pub mod memory;
pub mod postgres;
