//! FlowStatus - per-user onboarding lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Lifecycle of one user's progression through one campaign.
///
/// `Completed` is terminal: answers can still be edited afterwards, but the
/// engine never moves a flow back out of `Completed` on its own. The flag is
/// only ever recomputed to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl FlowStatus {
    /// Derives the status from answer presence and the completion check.
    pub fn derive(answered_count: usize, completed: bool) -> Self {
        if completed {
            FlowStatus::Completed
        } else if answered_count > 0 {
            FlowStatus::InProgress
        } else {
            FlowStatus::NotStarted
        }
    }

    /// Returns true if transition from self to target is valid.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (FlowStatus::NotStarted, FlowStatus::InProgress)
                | (FlowStatus::NotStarted, FlowStatus::Completed)
                | (FlowStatus::InProgress, FlowStatus::Completed)
        )
    }

    /// Performs a validated transition.
    pub fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "flow_status",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True once the flow has completed.
    pub fn is_complete(&self) -> bool {
        matches!(self, FlowStatus::Completed)
    }
}
