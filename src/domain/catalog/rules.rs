//! Validation and branching rule shapes.
//!
//! Rules are admin-authored JSON attached to field definitions. Both rule
//! families tolerate unknown discriminants: an unrecognized validation kind
//! or branching operator/action deserializes to the `Unknown` variant, which
//! the engines log and treat as a no-op (or false condition) rather than
//! rejecting the whole definition.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Validation rules
// ════════════════════════════════════════════════════════════════════════════

/// The kind of a custom validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRuleKind {
    Required,
    Min,
    Max,
    Contains,
    NotContains,
    Regex,
    Email,
    Url,
    Numeric,
    GreaterThan,
    LessThan,
    Equals,
    NotEquals,
    Empty,
    NotEmpty,
    #[serde(other)]
    Unknown,
}

/// One custom validation rule, evaluated in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub kind: ValidationRuleKind,
    /// Comparison operand; authored as either a JSON string or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Admin-authored override for the built-in error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ValidationRule {
    /// Creates a rule with no operand.
    pub fn new(kind: ValidationRuleKind) -> Self {
        Self {
            kind,
            value: None,
            message: None,
            case_sensitive: false,
        }
    }

    /// Creates a rule with a string operand.
    pub fn with_text(kind: ValidationRuleKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(serde_json::Value::String(value.into())),
            message: None,
            case_sensitive: false,
        }
    }

    /// Creates a rule with a numeric operand.
    pub fn with_number(kind: ValidationRuleKind, value: f64) -> Self {
        Self {
            kind,
            value: serde_json::Number::from_f64(value).map(serde_json::Value::Number),
            message: None,
            case_sensitive: false,
        }
    }

    /// Sets the admin-authored error message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Marks string comparisons for this rule as case sensitive.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Returns the operand as text, stringifying numbers.
    pub fn value_text(&self) -> Option<String> {
        value_as_text(self.value.as_ref())
    }

    /// Returns the operand coerced to a number, if it parses.
    pub fn value_number(&self) -> Option<f64> {
        value_as_number(self.value.as_ref())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Branching rules
// ════════════════════════════════════════════════════════════════════════════

/// Comparison operator of a branching condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Empty,
    NotEmpty,
    #[serde(other)]
    Unknown,
}

/// What a branching rule does when its condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchAction {
    Show,
    Hide,
    SkipToStep,
    #[serde(other)]
    Unknown,
}

/// The condition side of a branching rule, evaluated against accumulated
/// answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCondition {
    pub field_key: String,
    pub operator: BranchOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl BranchCondition {
    /// Returns the operand as text, stringifying numbers.
    pub fn value_text(&self) -> Option<String> {
        value_as_text(self.value.as_ref())
    }

    /// Returns the operand coerced to a number, if it parses.
    pub fn value_number(&self) -> Option<f64> {
        value_as_number(self.value.as_ref())
    }
}

/// One branching rule: when `condition` holds, apply `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchingRule {
    pub condition: BranchCondition,
    pub action: BranchAction,
    /// Fields shown or hidden by this rule.
    #[serde(default)]
    pub target_fields: Vec<String>,
    /// Step forced by a `skip_to_step` action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_step: Option<i32>,
}

impl BranchingRule {
    /// Creates a show/hide rule over target fields.
    pub fn visibility(
        condition: BranchCondition,
        action: BranchAction,
        target_fields: Vec<String>,
    ) -> Self {
        Self {
            condition,
            action,
            target_fields,
            target_step: None,
        }
    }

    /// Creates a skip-to-step rule.
    pub fn skip_to(condition: BranchCondition, target_step: i32) -> Self {
        Self {
            condition,
            action: BranchAction::SkipToStep,
            target_fields: Vec::new(),
            target_step: Some(target_step),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Operand coercion helpers
// ════════════════════════════════════════════════════════════════════════════

fn value_as_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_number(value: Option<&serde_json::Value>) -> Option<f64> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
