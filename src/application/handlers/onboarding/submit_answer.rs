//! SubmitAnswerHandler - validates and stores one turn's answer.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::catalog::FieldDefinition;
use crate::domain::flow::{AnswerRecord, AnswerSet, FlowProgress, NewAnswer, OnboardingError};
use crate::domain::foundation::{CampaignId, UserId};
use crate::domain::validation::{ValidationEngine, ValidationOptions};
use crate::ports::{AnswerRepository, FieldCatalogReader};

/// Command carrying one turn's answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub field_key: String,
    pub field_value: String,
}

/// Result of a stored answer.
#[derive(Debug, Clone)]
pub struct SubmitAnswerResult {
    pub stored: AnswerRecord,
    pub completed: bool,
    pub next_field: Option<FieldDefinition>,
    pub answered_keys: BTreeSet<String>,
    pub total_fields: usize,
    pub total_required: usize,
}

/// Handler for the conversational per-turn submit.
pub struct SubmitAnswerHandler {
    catalog: Arc<dyn FieldCatalogReader>,
    answers: Arc<dyn AnswerRepository>,
}

impl SubmitAnswerHandler {
    pub fn new(catalog: Arc<dyn FieldCatalogReader>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { catalog, answers }
    }

    /// Validates, upserts, and recomputes the flow.
    ///
    /// Validation failures and unknown field keys return without touching
    /// storage. Completion is recomputed against a snapshot loaded after
    /// the write; when the flow newly completes, every one of the user's
    /// rows is flagged in one batch update.
    pub async fn handle(
        &self,
        cmd: SubmitAnswerCommand,
    ) -> Result<SubmitAnswerResult, OnboardingError> {
        let catalog = self.catalog.load_catalog(&cmd.campaign_id).await?;

        let field = catalog
            .find(&cmd.field_key)
            .ok_or_else(|| OnboardingError::unknown_field(&cmd.field_key))?;

        let normalized =
            ValidationEngine::validate(&cmd.field_value, field, ValidationOptions::turn_based())
                .map_err(|messages| OnboardingError::validation(&cmd.field_key, messages))?;

        let mut stored = self
            .answers
            .upsert(NewAnswer {
                campaign_id: cmd.campaign_id,
                user_id: cmd.user_id.clone(),
                username: cmd.username,
                field_key: cmd.field_key.clone(),
                raw_value: cmd.field_value,
                normalized_value: normalized,
            })
            .await?;

        // Fresh snapshot after the write; the computation never mixes
        // pre- and post-write state.
        let records = self
            .answers
            .find_by_user(&cmd.campaign_id, &cmd.user_id)
            .await?;
        let snapshot = AnswerSet::new(records);
        let progress = FlowProgress::compute(&catalog, &snapshot);

        if progress.completed() && !snapshot.any_flagged_complete() {
            let touched = self
                .answers
                .mark_campaign_complete(&cmd.campaign_id, &cmd.user_id)
                .await?;
            stored.is_complete = true;
            tracing::info!(
                campaign_id = %cmd.campaign_id,
                user_id = %cmd.user_id,
                rows = touched,
                "onboarding flow completed"
            );
        }

        Ok(SubmitAnswerResult {
            stored,
            completed: progress.completed(),
            next_field: progress.next_field().cloned(),
            answered_keys: progress.answered_keys().clone(),
            total_fields: progress.total_fields(),
            total_required: progress.total_required(),
        })
    }
}
