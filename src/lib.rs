//! Onboard Flow - Onboarding rule-evaluation and flow-progression engine
//!
//! Campaign administrators define ordered question sets (validation rules,
//! branching rules, step grouping) with no code change; this crate validates
//! answers, evaluates branching, tracks per-user progress, and decides when
//! a flow is complete, for both a turn-based conversational surface and a
//! batch/step wizard surface.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
