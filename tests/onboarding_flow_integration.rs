//! Integration tests for the onboarding flow engine.
//!
//! These tests drive the real handlers end to end over the in-memory
//! adapters, covering the properties the engine guarantees:
//! 1. Upserts are idempotent per `(campaign, user, field)`
//! 2. Completion is monotonic once reached
//! 3. Required-but-hidden fields still block completion
//! 4. The two-surface flow (turn-based and wizard) agrees on state

use std::sync::Arc;

use onboard_flow::adapters::memory::{InMemoryAnswerRepository, InMemoryFieldCatalog};
use onboard_flow::application::handlers::onboarding::{
    GetStatusHandler, GetStatusQuery, StartOrResumeCommand, StartOrResumeHandler,
    SubmitAnswerCommand, SubmitAnswerHandler, ValidateStepCommand, ValidateStepHandler,
};
use onboard_flow::domain::catalog::{
    BranchAction, BranchCondition, BranchOperator, BranchingRule, FieldDefinition, FieldType,
};
use onboard_flow::domain::flow::OnboardingError;
use onboard_flow::domain::foundation::{CampaignId, UserId};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestHarness {
    campaign_id: CampaignId,
    answers: Arc<InMemoryAnswerRepository>,
    start: StartOrResumeHandler,
    submit: SubmitAnswerHandler,
    status: GetStatusHandler,
    step: ValidateStepHandler,
}

impl TestHarness {
    async fn new(definitions: Vec<FieldDefinition>) -> Self {
        let campaign_id = CampaignId::new();
        let catalog = Arc::new(InMemoryFieldCatalog::new());
        catalog.seed(campaign_id, definitions).await;
        let answers = Arc::new(InMemoryAnswerRepository::new());

        Self {
            campaign_id,
            answers: answers.clone(),
            start: StartOrResumeHandler::new(catalog.clone(), answers.clone()),
            submit: SubmitAnswerHandler::new(catalog.clone(), answers.clone()),
            status: GetStatusHandler::new(catalog.clone(), answers.clone()),
            step: ValidateStepHandler::new(catalog, answers),
        }
    }

    fn user() -> UserId {
        UserId::new("discord:1001").unwrap()
    }

    fn submit_cmd(&self, field_key: &str, value: &str) -> SubmitAnswerCommand {
        SubmitAnswerCommand {
            campaign_id: self.campaign_id,
            user_id: Self::user(),
            username: Some("Test User".to_string()),
            field_key: field_key.to_string(),
            field_value: value.to_string(),
        }
    }

    fn start_cmd(&self) -> StartOrResumeCommand {
        StartOrResumeCommand {
            campaign_id: self.campaign_id,
            user_id: Self::user(),
            username: Some("Test User".to_string()),
        }
    }

    fn status_query(&self) -> GetStatusQuery {
        GetStatusQuery {
            campaign_id: self.campaign_id,
            user_id: Self::user(),
        }
    }
}

fn email_and_color() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("email", "Email", FieldType::Email)
            .required()
            .with_sort_order(0),
        FieldDefinition::new("favorite_color", "Favorite color", FieldType::Select)
            .required()
            .with_options(vec!["Red", "Blue"])
            .with_sort_order(1),
    ]
}

// =============================================================================
// End-to-end turn-based flow
// =============================================================================

#[tokio::test]
async fn full_conversational_flow_from_start_to_completion() {
    let harness = TestHarness::new(email_and_color()).await;

    // Start: two fields, nothing answered yet.
    let opened = harness.start.handle(harness.start_cmd()).await.unwrap();
    assert_eq!(opened.fields.len(), 2);
    assert!(!opened.state.completed);
    assert_eq!(opened.state.next_field.unwrap().field_key, "email");

    // First answer: flow advances but is not complete.
    let first = harness
        .submit
        .handle(harness.submit_cmd("email", "a@b.com"))
        .await
        .unwrap();
    assert!(!first.completed);
    assert_eq!(first.next_field.unwrap().field_key, "favorite_color");

    // Second answer: lowercase input stored with the option's casing,
    // flow completes, no next field.
    let second = harness
        .submit
        .handle(harness.submit_cmd("favorite_color", "red"))
        .await
        .unwrap();
    assert_eq!(second.stored.normalized_value, "Red");
    assert!(second.completed);
    assert!(second.next_field.is_none());

    // Status agrees, and every stored row carries the completion flag.
    let status = harness.status.handle(harness.status_query()).await.unwrap();
    assert!(status.state.completed);
    assert_eq!(status.progress, (2, 2));
    assert!(status.responses.iter().all(|r| r.is_complete));
}

#[tokio::test]
async fn resuming_mid_flow_picks_up_where_the_user_left_off() {
    let harness = TestHarness::new(email_and_color()).await;

    harness
        .submit
        .handle(harness.submit_cmd("email", "a@b.com"))
        .await
        .unwrap();

    let resumed = harness.start.handle(harness.start_cmd()).await.unwrap();
    assert_eq!(resumed.existing.len(), 1);
    assert_eq!(resumed.state.next_field.unwrap().field_key, "favorite_color");
}

// =============================================================================
// Upsert and completion invariants
// =============================================================================

#[tokio::test]
async fn double_submit_keeps_one_row_with_the_later_value() {
    let harness = TestHarness::new(email_and_color()).await;

    let first = harness
        .submit
        .handle(harness.submit_cmd("email", "first@b.com"))
        .await
        .unwrap();
    let second = harness
        .submit
        .handle(harness.submit_cmd("email", "second@b.com"))
        .await
        .unwrap();

    assert_eq!(harness.answers.row_count().await, 1);
    assert_eq!(second.stored.normalized_value, "second@b.com");
    assert_eq!(second.stored.created_at, first.stored.created_at);
    assert!(!second.stored.updated_at.is_before(&first.stored.updated_at));
}

#[tokio::test]
async fn completion_survives_a_benign_later_edit() {
    let definitions = vec![
        FieldDefinition::new("email", "Email", FieldType::Email).required(),
        FieldDefinition::new("nickname", "Nickname", FieldType::Text).with_sort_order(1),
    ];
    let harness = TestHarness::new(definitions).await;

    let done = harness
        .submit
        .handle(harness.submit_cmd("email", "a@b.com"))
        .await
        .unwrap();
    assert!(done.completed);

    // Editing the optional field afterwards does not un-complete the flow.
    let edited = harness
        .submit
        .handle(harness.submit_cmd("nickname", "Alex"))
        .await
        .unwrap();
    assert!(edited.completed);

    let status = harness.status.handle(harness.status_query()).await.unwrap();
    assert!(status.state.completed);
}

#[tokio::test]
async fn unknown_field_never_writes_a_row() {
    let harness = TestHarness::new(email_and_color()).await;

    let err = harness
        .submit
        .handle(harness.submit_cmd("shoe_size", "42"))
        .await
        .unwrap_err();

    assert!(matches!(err, OnboardingError::UnknownField { .. }));
    assert_eq!(harness.answers.row_count().await, 0);
}

#[tokio::test]
async fn required_field_hidden_by_branching_still_blocks_completion() {
    let definitions = vec![
        FieldDefinition::new("plan", "Plan", FieldType::Select)
            .required()
            .with_options(vec!["Free", "Pro"])
            .with_branching_rules(vec![BranchingRule::visibility(
                BranchCondition {
                    field_key: "plan".to_string(),
                    operator: BranchOperator::Equals,
                    value: Some(serde_json::Value::String("Free".to_string())),
                    case_sensitive: false,
                },
                BranchAction::Hide,
                vec!["billing_email".to_string()],
            )]),
        FieldDefinition::new("billing_email", "Billing email", FieldType::Email)
            .required()
            .with_sort_order(1),
    ];
    let harness = TestHarness::new(definitions).await;

    let after_plan = harness
        .submit
        .handle(harness.submit_cmd("plan", "free"))
        .await
        .unwrap();

    // The hide rule fired, but the hidden field is still required.
    assert!(!after_plan.completed);
    assert_eq!(after_plan.next_field.unwrap().field_key, "billing_email");

    let status = harness.status.handle(harness.status_query()).await.unwrap();
    assert!(!status.state.visible_keys.contains("billing_email"));
    assert!(!status.state.completed);

    // Answering it (e.g. after the admin revisits the branching design)
    // completes the flow.
    let done = harness
        .submit
        .handle(harness.submit_cmd("billing_email", "pay@b.com"))
        .await
        .unwrap();
    assert!(done.completed);
}

#[tokio::test]
async fn campaign_without_fields_is_immediately_complete() {
    let harness = TestHarness::new(vec![]).await;

    let opened = harness.start.handle(harness.start_cmd()).await.unwrap();
    assert!(opened.fields.is_empty());
    assert!(opened.state.completed);
    assert!(opened.state.next_field.is_none());
}

// =============================================================================
// Wizard surface agrees with the turn-based surface
// =============================================================================

#[tokio::test]
async fn wizard_steps_and_turns_share_one_answer_state() {
    let definitions = vec![
        FieldDefinition::new("email", "Email", FieldType::Email)
            .required()
            .with_step(1),
        FieldDefinition::new("company", "Company", FieldType::Text)
            .required()
            .with_step(2),
    ];
    let harness = TestHarness::new(definitions).await;

    // Step 1 submitted through the wizard.
    let step_one = harness
        .step
        .handle(ValidateStepCommand {
            campaign_id: harness.campaign_id,
            user_id: TestHarness::user(),
            username: None,
            step_number: 1,
            answers: [("email".to_string(), "a@b.com".to_string())].into(),
        })
        .await
        .unwrap();
    assert!(step_one.field_errors.is_empty());
    assert_eq!(step_one.next_step, Some(2));
    assert!(!step_one.completed);

    // The final answer arrives through the conversational surface.
    let done = harness
        .submit
        .handle(harness.submit_cmd("company", "Acme"))
        .await
        .unwrap();
    assert!(done.completed);

    let status = harness.status.handle(harness.status_query()).await.unwrap();
    assert_eq!(status.progress, (2, 2));
    assert!(status.responses.iter().all(|r| r.is_complete));
}

#[tokio::test]
async fn wizard_rejects_a_step_without_storing_anything() {
    let harness = TestHarness::new(email_and_color()).await;

    let rejected = harness
        .step
        .handle(ValidateStepCommand {
            campaign_id: harness.campaign_id,
            user_id: TestHarness::user(),
            username: None,
            step_number: 1,
            answers: [
                ("email".to_string(), "nope".to_string()),
                ("favorite_color".to_string(), "Blue".to_string()),
            ]
            .into(),
        })
        .await
        .unwrap();

    // One bad field rejects the whole step.
    assert_eq!(rejected.field_errors.len(), 1);
    assert!(rejected.field_errors.contains_key("email"));
    assert_eq!(harness.answers.row_count().await, 0);
}

#[tokio::test]
async fn skip_rule_jumps_the_wizard_past_a_step() {
    let definitions = vec![
        FieldDefinition::new("has_team", "Do you have a team?", FieldType::Checkbox)
            .required()
            .with_step(1)
            .with_branching_rules(vec![BranchingRule::skip_to(
                BranchCondition {
                    field_key: "has_team".to_string(),
                    operator: BranchOperator::Equals,
                    value: Some(serde_json::Value::String("false".to_string())),
                    case_sensitive: false,
                },
                3,
            )]),
        FieldDefinition::new("team_size", "Team size", FieldType::Number).with_step(2),
        FieldDefinition::new("goals", "Goals", FieldType::Textarea).with_step(3),
    ];
    let harness = TestHarness::new(definitions).await;

    let result = harness
        .step
        .handle(ValidateStepCommand {
            campaign_id: harness.campaign_id,
            user_id: TestHarness::user(),
            username: None,
            step_number: 1,
            answers: [("has_team".to_string(), "no".to_string())].into(),
        })
        .await
        .unwrap();

    assert!(result.field_errors.is_empty());
    assert_eq!(result.next_step, Some(3));
}
