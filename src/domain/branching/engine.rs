//! BranchingEngine - evaluates branching rules over accumulated answers.

use std::collections::{BTreeSet, HashMap};

use crate::domain::catalog::{BranchAction, BranchCondition, BranchOperator, FieldCatalog};

/// Result of one branching evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOutcome {
    /// Keys currently visible. Starts as every enabled key; show/hide
    /// rules mutate it in evaluation order.
    pub visible: BTreeSet<String>,
    /// Step forced by the last matching `skip_to_step` rule, if any.
    pub forced_next_step: Option<i32>,
}

/// Pure evaluation of branching rules.
///
/// Rules are walked in catalog order (field `(step_number, sort_order)`,
/// then each field's rule list order). There is no priority field: when two
/// rules disagree about the same target, the one evaluated later wins, for
/// visibility and for forced steps alike.
pub struct BranchingEngine;

impl BranchingEngine {
    /// Evaluates every branching rule in the catalog against the answers.
    pub fn evaluate(catalog: &FieldCatalog, answers: &HashMap<String, String>) -> BranchOutcome {
        let mut visible: BTreeSet<String> = catalog.keys().map(String::from).collect();
        let mut forced_next_step = None;

        for field in catalog.fields() {
            for rule in &field.branching_rules {
                if !Self::condition_holds(&rule.condition, answers) {
                    continue;
                }
                match rule.action {
                    BranchAction::Show => {
                        for key in &rule.target_fields {
                            visible.insert(key.clone());
                        }
                    }
                    BranchAction::Hide => {
                        for key in &rule.target_fields {
                            visible.remove(key.as_str());
                        }
                    }
                    BranchAction::SkipToStep => match rule.target_step {
                        Some(step) => forced_next_step = Some(step),
                        None => tracing::warn!(
                            field_key = %field.field_key,
                            "skip_to_step rule without a target step, ignoring"
                        ),
                    },
                    BranchAction::Unknown => {
                        tracing::warn!(
                            field_key = %field.field_key,
                            "ignoring branching rule with unknown action"
                        );
                    }
                }
            }
        }

        BranchOutcome {
            visible,
            forced_next_step,
        }
    }

    /// Evaluates only the rules carried by fields in the given step,
    /// returning the forced step if one applies. Used for wizard next-step
    /// computation.
    pub fn forced_step(
        catalog: &FieldCatalog,
        answers: &HashMap<String, String>,
        step_number: i32,
    ) -> Option<i32> {
        let mut forced = None;
        for field in catalog.fields_in_step(step_number) {
            for rule in &field.branching_rules {
                if rule.action != BranchAction::SkipToStep {
                    continue;
                }
                if let Some(step) = rule.target_step {
                    if Self::condition_holds(&rule.condition, answers) {
                        forced = Some(step);
                    }
                }
            }
        }
        forced
    }

    /// Evaluates one condition against the answers. A missing answer reads
    /// as the empty string; unknown operators are false.
    fn condition_holds(condition: &BranchCondition, answers: &HashMap<String, String>) -> bool {
        let actual = answers
            .get(&condition.field_key)
            .map(|v| v.trim())
            .unwrap_or("");

        match condition.operator {
            BranchOperator::Empty => actual.is_empty(),
            BranchOperator::NotEmpty => !actual.is_empty(),
            BranchOperator::Equals => {
                text_equals(actual, &condition.value_text().unwrap_or_default(), condition.case_sensitive)
            }
            BranchOperator::NotEquals => {
                !text_equals(actual, &condition.value_text().unwrap_or_default(), condition.case_sensitive)
            }
            BranchOperator::Contains => {
                text_contains(actual, &condition.value_text().unwrap_or_default(), condition.case_sensitive)
            }
            BranchOperator::NotContains => {
                !text_contains(actual, &condition.value_text().unwrap_or_default(), condition.case_sensitive)
            }
            BranchOperator::GreaterThan => numeric_compare(actual, condition, |a, b| a > b),
            BranchOperator::LessThan => numeric_compare(actual, condition, |a, b| a < b),
            BranchOperator::GreaterThanOrEqual => numeric_compare(actual, condition, |a, b| a >= b),
            BranchOperator::LessThanOrEqual => numeric_compare(actual, condition, |a, b| a <= b),
            BranchOperator::Unknown => {
                tracing::warn!(
                    field_key = %condition.field_key,
                    "branching condition with unknown operator evaluates to false"
                );
                false
            }
        }
    }
}

fn text_equals(left: &str, right: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        left == right
    } else {
        left.to_lowercase() == right.to_lowercase()
    }
}

fn text_contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Coerces both sides to numbers; false when either fails to parse.
fn numeric_compare(
    actual: &str,
    condition: &BranchCondition,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    match (actual.parse::<f64>(), condition.value_number()) {
        (Ok(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
