//! StartOrResumeHandler - opens or resumes one user's onboarding flow.

use std::sync::Arc;

use crate::domain::catalog::FieldDefinition;
use crate::domain::flow::{AnswerRecord, AnswerSet, FlowState, OnboardingError};
use crate::domain::foundation::{CampaignId, UserId};
use crate::ports::{AnswerRepository, FieldCatalogReader};

/// Command to start or resume a flow.
#[derive(Debug, Clone)]
pub struct StartOrResumeCommand {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub username: Option<String>,
}

/// Result of starting or resuming.
#[derive(Debug, Clone)]
pub struct StartOrResumeResult {
    /// Enabled definitions in presentation order.
    pub fields: Vec<FieldDefinition>,
    /// The user's previously stored answers.
    pub existing: Vec<AnswerRecord>,
    pub state: FlowState,
}

/// Handler for opening a flow session.
pub struct StartOrResumeHandler {
    catalog: Arc<dyn FieldCatalogReader>,
    answers: Arc<dyn AnswerRepository>,
}

impl StartOrResumeHandler {
    pub fn new(catalog: Arc<dyn FieldCatalogReader>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { catalog, answers }
    }

    pub async fn handle(
        &self,
        cmd: StartOrResumeCommand,
    ) -> Result<StartOrResumeResult, OnboardingError> {
        let catalog = self.catalog.load_catalog(&cmd.campaign_id).await?;
        let records = self
            .answers
            .find_by_user(&cmd.campaign_id, &cmd.user_id)
            .await?;
        let snapshot = AnswerSet::new(records);

        let state = FlowState::compute(cmd.campaign_id, cmd.user_id, &catalog, &snapshot);

        tracing::debug!(
            campaign_id = %state.campaign_id,
            user_id = %state.user_id,
            answered = state.answered_keys.len(),
            completed = state.completed,
            "flow session opened"
        );

        Ok(StartOrResumeResult {
            fields: catalog.fields().to_vec(),
            existing: snapshot.records().to_vec(),
            state,
        })
    }
}
