//! GetStatusHandler - read-only progress snapshot for one user.

use std::sync::Arc;

use crate::domain::catalog::FieldDefinition;
use crate::domain::flow::{AnswerRecord, AnswerSet, FlowState, OnboardingError};
use crate::domain::foundation::{CampaignId, UserId};
use crate::ports::{AnswerRepository, FieldCatalogReader};

/// Query for one user's flow status.
#[derive(Debug, Clone)]
pub struct GetStatusQuery {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
}

/// Read-only status view.
#[derive(Debug, Clone)]
pub struct GetStatusResult {
    pub fields: Vec<FieldDefinition>,
    pub responses: Vec<AnswerRecord>,
    pub state: FlowState,
    /// Answered count over total enabled fields.
    pub progress: (usize, usize),
}

/// Handler for the status query.
pub struct GetStatusHandler {
    catalog: Arc<dyn FieldCatalogReader>,
    answers: Arc<dyn AnswerRepository>,
}

impl GetStatusHandler {
    pub fn new(catalog: Arc<dyn FieldCatalogReader>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { catalog, answers }
    }

    pub async fn handle(&self, query: GetStatusQuery) -> Result<GetStatusResult, OnboardingError> {
        let catalog = self.catalog.load_catalog(&query.campaign_id).await?;
        let records = self
            .answers
            .find_by_user(&query.campaign_id, &query.user_id)
            .await?;
        let snapshot = AnswerSet::new(records);

        let state = FlowState::compute(query.campaign_id, query.user_id, &catalog, &snapshot);
        let progress = (state.answered_keys.len(), catalog.len());

        Ok(GetStatusResult {
            fields: catalog.fields().to_vec(),
            responses: snapshot.records().to_vec(),
            state,
            progress,
        })
    }
}
