//! FlowState - the full per-request materialization of one user's flow.

use std::collections::BTreeSet;

use crate::domain::branching::BranchingEngine;
use crate::domain::catalog::{FieldCatalog, FieldDefinition};
use crate::domain::flow::{compute_next_step, AnswerSet, FlowProgress, FlowStatus};
use crate::domain::foundation::{CampaignId, UserId};

/// Everything a surface needs to render one user's position in the flow.
///
/// Computed (never persisted as its own entity) from the catalog and one
/// answer snapshot, bundling progress, branching visibility, and the
/// forward-looking step computation.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    /// Step of the next field to ask, or the last step when finished.
    pub current_step: i32,
    pub answered_keys: BTreeSet<String>,
    /// Keys visible after branching evaluation.
    pub visible_keys: BTreeSet<String>,
    pub completed: bool,
    pub status: FlowStatus,
    pub next_field: Option<FieldDefinition>,
    pub next_step: Option<i32>,
}

impl FlowState {
    /// Materializes the flow state for one user against one snapshot.
    pub fn compute(
        campaign_id: CampaignId,
        user_id: UserId,
        catalog: &FieldCatalog,
        answers: &AnswerSet,
    ) -> Self {
        let progress = FlowProgress::compute(catalog, answers);
        let values = answers.values();
        let branching = BranchingEngine::evaluate(catalog, &values);

        let current_step = progress
            .next_field()
            .map(|f| f.step_number)
            .or_else(|| catalog.fields().last().map(|f| f.step_number))
            .unwrap_or(1);
        let next_step = compute_next_step(catalog, &values, current_step);

        Self {
            campaign_id,
            user_id,
            current_step,
            answered_keys: progress.answered_keys().clone(),
            visible_keys: branching.visible,
            completed: progress.completed(),
            status: progress.status(),
            next_field: progress.next_field().cloned(),
            next_step,
        }
    }
}
