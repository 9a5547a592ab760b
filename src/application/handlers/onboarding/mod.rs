//! Onboarding flow handlers.
//!
//! Thin orchestration over the domain engines: load the catalog, take one
//! answer snapshot, compute, persist, recompute against a fresh snapshot.
//! The turn-based surface uses `StartOrResume`/`SubmitAnswer`/`GetStatus`;
//! the wizard consumes `ValidateStep` directly in-process.

mod get_status;
mod start_or_resume;
mod submit_answer;
mod validate_step;

pub use get_status::{GetStatusHandler, GetStatusQuery, GetStatusResult};
pub use start_or_resume::{StartOrResumeCommand, StartOrResumeHandler, StartOrResumeResult};
pub use submit_answer::{SubmitAnswerCommand, SubmitAnswerHandler, SubmitAnswerResult};
pub use validate_step::{ValidateStepCommand, ValidateStepHandler, ValidateStepResult};
