//! ValidateStepHandler - whole-step batch validation for the wizard.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::domain::branching::BranchingEngine;
use crate::domain::flow::{
    compute_next_step, AnswerRecord, AnswerSet, FlowProgress, NewAnswer, OnboardingError,
};
use crate::domain::foundation::{CampaignId, UserId};
use crate::domain::validation::{ValidationEngine, ValidationOptions};
use crate::ports::{AnswerRepository, FieldCatalogReader};

/// Command carrying one wizard step's worth of answers.
#[derive(Debug, Clone)]
pub struct ValidateStepCommand {
    pub campaign_id: CampaignId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub step_number: i32,
    /// Submitted values keyed by field key.
    pub answers: HashMap<String, String>,
}

/// Result of a step submission.
///
/// When `field_errors` is non-empty nothing was stored; the wizard renders
/// the aggregated list and re-prompts for the whole step.
#[derive(Debug, Clone)]
pub struct ValidateStepResult {
    pub field_errors: BTreeMap<String, Vec<String>>,
    pub stored: Vec<AnswerRecord>,
    pub completed: bool,
    pub next_step: Option<i32>,
}

/// Handler for the wizard's per-step batch surface.
pub struct ValidateStepHandler {
    catalog: Arc<dyn FieldCatalogReader>,
    answers: Arc<dyn AnswerRepository>,
}

impl ValidateStepHandler {
    pub fn new(catalog: Arc<dyn FieldCatalogReader>, answers: Arc<dyn AnswerRepository>) -> Self {
        Self { catalog, answers }
    }

    /// Validates every field of the step in accumulate-all mode, stores
    /// nothing unless the whole step is clean, and computes the next step.
    pub async fn handle(
        &self,
        cmd: ValidateStepCommand,
    ) -> Result<ValidateStepResult, OnboardingError> {
        let catalog = self.catalog.load_catalog(&cmd.campaign_id).await?;

        // Submitted keys must reference enabled fields.
        for key in cmd.answers.keys() {
            if catalog.find(key).is_none() {
                return Err(OnboardingError::unknown_field(key));
            }
        }

        let existing = self
            .answers
            .find_by_user(&cmd.campaign_id, &cmd.user_id)
            .await?;
        let snapshot = AnswerSet::new(existing);

        // Visibility is re-derived over prior answers merged with this
        // submission, so a field hidden by an answer given in the same step
        // is not required to be filled in.
        let mut merged = snapshot.values();
        merged.extend(cmd.answers.clone());
        let visible = BranchingEngine::evaluate(&catalog, &merged).visible;

        let mut field_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut validated: Vec<(String, String, String)> = Vec::new();

        for field in catalog.fields_in_step(cmd.step_number) {
            let provided = cmd.answers.get(&field.field_key);
            let hidden = !visible.contains(&field.field_key);

            let raw = match provided {
                Some(value) => value.as_str(),
                // An unsubmitted hidden field is simply skipped; an
                // unsubmitted visible field validates as blank.
                None if hidden => continue,
                None => "",
            };

            // Unlike the implicitly-required turn surface, the batch
            // surface is rule-driven: only required fields reject blank,
            // and a hidden field never does.
            let opts = if hidden || !field.is_required {
                ValidationOptions::batch().allow_empty()
            } else {
                ValidationOptions::batch()
            };

            match ValidationEngine::validate(raw, field, opts) {
                Ok(normalized) => {
                    if provided.is_some() {
                        validated.push((
                            field.field_key.clone(),
                            raw.to_string(),
                            normalized,
                        ));
                    }
                }
                Err(messages) => {
                    field_errors.insert(field.field_key.clone(), messages);
                }
            }
        }

        if !field_errors.is_empty() {
            return Ok(ValidateStepResult {
                field_errors,
                stored: Vec::new(),
                completed: false,
                next_step: None,
            });
        }

        let mut stored = Vec::with_capacity(validated.len());
        for (field_key, raw_value, normalized_value) in validated {
            let record = self
                .answers
                .upsert(NewAnswer {
                    campaign_id: cmd.campaign_id,
                    user_id: cmd.user_id.clone(),
                    username: cmd.username.clone(),
                    field_key,
                    raw_value,
                    normalized_value,
                })
                .await?;
            stored.push(record);
        }

        let records = self
            .answers
            .find_by_user(&cmd.campaign_id, &cmd.user_id)
            .await?;
        let fresh = AnswerSet::new(records);
        let progress = FlowProgress::compute(&catalog, &fresh);

        if progress.completed() && !fresh.any_flagged_complete() {
            self.answers
                .mark_campaign_complete(&cmd.campaign_id, &cmd.user_id)
                .await?;
            for record in &mut stored {
                record.is_complete = true;
            }
            tracing::info!(
                campaign_id = %cmd.campaign_id,
                user_id = %cmd.user_id,
                "onboarding flow completed via wizard step"
            );
        }

        let next_step = compute_next_step(&catalog, &fresh.values(), cmd.step_number);

        Ok(ValidateStepResult {
            field_errors,
            stored,
            completed: progress.completed(),
            next_step,
        })
    }
}
