//! Flow state tracking - answered keys, completion, next field and step.
//!
//! Everything here computes over one fully-materialized answer snapshot
//! ([`AnswerSet`]) and returns new values instead of mutating shared
//! structures, so a computation can never observe a torn answer set.
//!
//! # Module Organization
//!
//! - `answer` - `AnswerRecord` and the `AnswerSet` snapshot
//! - `errors` - `OnboardingError`, the flow-scoped error taxonomy
//! - `status` - `FlowStatus` state machine (no regression from `Completed`)
//! - `progress` - `FlowProgress`, the computed per-user progress view
//! - `state` - `FlowState`, the full per-request materialization
//! - `step` - next-step computation for the wizard surface

mod answer;
mod errors;
mod progress;
mod state;
mod status;
mod step;

pub use answer::{AnswerRecord, AnswerSet, NewAnswer};
pub use errors::OnboardingError;
pub use progress::FlowProgress;
pub use state::FlowState;
pub use status::FlowStatus;
pub use step::compute_next_step;
