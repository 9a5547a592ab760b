//! FlowProgress - computed per-user progress over a campaign's catalog.

use std::collections::BTreeSet;

use crate::domain::catalog::{FieldCatalog, FieldDefinition};
use crate::domain::flow::{AnswerSet, FlowStatus};

/// Snapshot of one user's progress through one campaign.
///
/// Computed from the catalog and one answer snapshot; read-only afterwards.
///
/// Completion is strict: every required enabled field must hold a non-blank
/// answer. Branching visibility never shrinks the required set, so a
/// required field hidden by a `hide` rule still blocks completion until it
/// is answered. Once any stored record carries the completion latch, the
/// flow reports completed even if a later edit would otherwise change the
/// computation.
#[derive(Debug, Clone)]
pub struct FlowProgress {
    answered: BTreeSet<String>,
    required: BTreeSet<String>,
    total_fields: usize,
    next_field: Option<FieldDefinition>,
    completed: bool,
}

impl FlowProgress {
    /// Computes progress from the catalog and an answer snapshot.
    pub fn compute(catalog: &FieldCatalog, answers: &AnswerSet) -> Self {
        let answered_in_snapshot = answers.answered_keys();

        // Count only keys that still belong to an enabled field; stale rows
        // for since-disabled fields do not contribute to progress.
        let answered: BTreeSet<String> = catalog
            .keys()
            .filter(|key| answered_in_snapshot.contains(key))
            .map(String::from)
            .collect();

        let required: BTreeSet<String> =
            catalog.required_keys().iter().map(|k| k.to_string()).collect();

        let all_required_answered = required.iter().all(|key| answered.contains(key));
        let completed = all_required_answered || answers.any_flagged_complete();

        let next_field = catalog
            .fields()
            .iter()
            .find(|f| !answered.contains(&f.field_key))
            .cloned();

        Self {
            answered,
            required,
            total_fields: catalog.len(),
            next_field,
            completed,
        }
    }

    /// True when every required enabled field is answered (or the stored
    /// latch is already set).
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Lifecycle status derived from this snapshot.
    pub fn status(&self) -> FlowStatus {
        FlowStatus::derive(self.answered.len(), self.completed)
    }

    /// Keys answered with a non-blank value, restricted to enabled fields.
    pub fn answered_keys(&self) -> &BTreeSet<String> {
        &self.answered
    }

    /// Number of answered enabled fields.
    pub fn completed_count(&self) -> usize {
        self.answered.len()
    }

    /// Number of enabled fields in the catalog.
    pub fn total_fields(&self) -> usize {
        self.total_fields
    }

    /// Number of required enabled fields.
    pub fn total_required(&self) -> usize {
        self.required.len()
    }

    /// First enabled field (in presentation order) without an answer.
    pub fn next_field(&self) -> Option<&FieldDefinition> {
        self.next_field.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{
        BranchAction, BranchCondition, BranchOperator, BranchingRule, FieldType,
    };
    use crate::domain::foundation::{CampaignId, Timestamp, UserId};
    use crate::domain::flow::AnswerRecord;

    fn record(field_key: &str, value: &str) -> AnswerRecord {
        AnswerRecord {
            campaign_id: CampaignId::new(),
            user_id: UserId::new("user-1").unwrap(),
            username: None,
            field_key: field_key.to_string(),
            raw_value: value.to_string(),
            normalized_value: value.to_string(),
            is_complete: false,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn two_field_catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDefinition::new("email", "Email", FieldType::Email)
                .required()
                .with_sort_order(0),
            FieldDefinition::new("favorite_color", "Favorite color", FieldType::Select)
                .required()
                .with_options(vec!["Red", "Blue"])
                .with_sort_order(1),
        ])
    }

    #[test]
    fn fresh_flow_points_at_first_field() {
        let progress = FlowProgress::compute(&two_field_catalog(), &AnswerSet::default());
        assert!(!progress.completed());
        assert_eq!(progress.status(), FlowStatus::NotStarted);
        assert_eq!(progress.next_field().unwrap().field_key, "email");
        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.total_required(), 2);
    }

    #[test]
    fn partial_answers_advance_to_next_unanswered_field() {
        let answers = AnswerSet::new(vec![record("email", "a@b.com")]);
        let progress = FlowProgress::compute(&two_field_catalog(), &answers);
        assert!(!progress.completed());
        assert_eq!(progress.status(), FlowStatus::InProgress);
        assert_eq!(progress.next_field().unwrap().field_key, "favorite_color");
    }

    #[test]
    fn all_required_answered_completes_the_flow() {
        let answers = AnswerSet::new(vec![
            record("email", "a@b.com"),
            record("favorite_color", "Red"),
        ]);
        let progress = FlowProgress::compute(&two_field_catalog(), &answers);
        assert!(progress.completed());
        assert_eq!(progress.status(), FlowStatus::Completed);
        assert!(progress.next_field().is_none());
    }

    #[test]
    fn blank_stored_value_does_not_count_as_answered() {
        let answers = AnswerSet::new(vec![record("email", "  ")]);
        let progress = FlowProgress::compute(&two_field_catalog(), &answers);
        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.next_field().unwrap().field_key, "email");
    }

    #[test]
    fn answered_is_a_presence_check_not_a_revalidation() {
        // A stored value that would fail email validation still counts.
        let answers = AnswerSet::new(vec![record("email", "not-an-email")]);
        let progress = FlowProgress::compute(&two_field_catalog(), &answers);
        assert!(progress.answered_keys().contains("email"));
        assert_eq!(progress.next_field().unwrap().field_key, "favorite_color");
    }

    #[test]
    fn optional_fields_do_not_block_completion() {
        let catalog = FieldCatalog::new(vec![
            FieldDefinition::new("email", "Email", FieldType::Email).required(),
            FieldDefinition::new("nickname", "Nickname", FieldType::Text),
        ]);
        let answers = AnswerSet::new(vec![record("email", "a@b.com")]);
        let progress = FlowProgress::compute(&catalog, &answers);
        assert!(progress.completed());
        // The optional field is still the next one to ask.
        assert_eq!(progress.next_field().unwrap().field_key, "nickname");
    }

    #[test]
    fn required_field_hidden_by_branching_still_blocks_completion() {
        let catalog = FieldCatalog::new(vec![
            FieldDefinition::new("plan", "Plan", FieldType::Select)
                .required()
                .with_branching_rules(vec![BranchingRule::visibility(
                    BranchCondition {
                        field_key: "plan".to_string(),
                        operator: BranchOperator::Equals,
                        value: Some(serde_json::Value::String("free".to_string())),
                        case_sensitive: false,
                    },
                    BranchAction::Hide,
                    vec!["billing_email".to_string()],
                )]),
            FieldDefinition::new("billing_email", "Billing email", FieldType::Email).required(),
        ]);

        // "billing_email" is hidden for free-plan users, but the required
        // set is visibility-independent.
        let answers = AnswerSet::new(vec![record("plan", "free")]);
        let progress = FlowProgress::compute(&catalog, &answers);
        assert!(!progress.completed());
        assert_eq!(progress.next_field().unwrap().field_key, "billing_email");
    }

    #[test]
    fn stale_answer_for_disabled_field_is_ignored() {
        let catalog = FieldCatalog::new(vec![
            FieldDefinition::new("email", "Email", FieldType::Email).required(),
            FieldDefinition::new("legacy", "Legacy", FieldType::Text).disabled(),
        ]);
        let answers = AnswerSet::new(vec![record("legacy", "old value")]);
        let progress = FlowProgress::compute(&catalog, &answers);
        assert_eq!(progress.completed_count(), 0);
        assert_eq!(progress.total_fields(), 1);
    }

    #[test]
    fn completion_latch_holds_even_when_computation_disagrees() {
        let mut flagged = record("email", "a@b.com");
        flagged.is_complete = true;
        // "favorite_color" unanswered, so the computation alone would say
        // incomplete; the stored latch wins.
        let answers = AnswerSet::new(vec![flagged]);
        let progress = FlowProgress::compute(&two_field_catalog(), &answers);
        assert!(progress.completed());
    }

    #[test]
    fn empty_catalog_short_circuits_to_completed() {
        let progress = FlowProgress::compute(&FieldCatalog::new(vec![]), &AnswerSet::default());
        assert!(progress.completed());
        assert!(progress.next_field().is_none());
        assert_eq!(progress.status(), FlowStatus::Completed);
    }
}
