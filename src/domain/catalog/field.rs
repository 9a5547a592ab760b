//! FieldDefinition - one onboarding question belonging to a campaign.

use serde::{Deserialize, Serialize};

use super::{BranchingRule, FieldType, ValidationRule};

/// Admin-authored description of one onboarding question.
///
/// Definitions are created and edited by campaign authoring tooling; the
/// engine treats them as read-only. `field_key` is unique within a campaign,
/// `(step_number, sort_order)` defines presentation order, and only enabled
/// definitions participate in flow computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Option list for select/multiselect. A hint for canonical casing,
    /// not an enforced enum.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_step_number")]
    pub step_number: i32,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default)]
    pub branching_rules: Vec<BranchingRule>,
}

fn default_enabled() -> bool {
    true
}

fn default_step_number() -> i32 {
    1
}

impl FieldDefinition {
    /// Creates an enabled, optional field with defaults for everything else.
    pub fn new(
        field_key: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            field_key: field_key.into(),
            label: label.into(),
            field_type,
            placeholder: None,
            description: None,
            options: Vec::new(),
            is_required: false,
            is_enabled: true,
            sort_order: 0,
            step_number: 1,
            validation_rules: Vec::new(),
            branching_rules: Vec::new(),
        }
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Disables the field, removing it from flow computation.
    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }

    /// Sets the option list.
    pub fn with_options(mut self, options: Vec<&str>) -> Self {
        self.options = options.into_iter().map(String::from).collect();
        self
    }

    /// Sets the step this field is grouped into.
    pub fn with_step(mut self, step_number: i32) -> Self {
        self.step_number = step_number;
        self
    }

    /// Sets the sort order within a step.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Attaches custom validation rules.
    pub fn with_validation_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.validation_rules = rules;
        self
    }

    /// Attaches branching rules.
    pub fn with_branching_rules(mut self, rules: Vec<BranchingRule>) -> Self {
        self.branching_rules = rules;
        self
    }

    /// Presentation order key: step first, sort order breaks ties.
    pub fn order_key(&self) -> (i32, i32) {
        (self.step_number, self.sort_order)
    }
}
