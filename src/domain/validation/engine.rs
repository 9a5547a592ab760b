//! ValidationEngine - validates one raw answer against one field definition.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::catalog::{FieldDefinition, FieldType, ValidationRule, ValidationRuleKind};

/// Practical email shape check: something, an @, a domain with a dot.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Date formats accepted from end users, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// How rule failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Stop at the first failing rule (inline, per-turn UX).
    FirstFailure,
    /// Evaluate every rule and accumulate failures (end-of-step summary UX).
    CollectAll,
}

/// Caller-selected validation behavior.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    pub mode: ValidationMode,
    /// When set, a blank-after-trim answer fails with "This field is
    /// required" regardless of the field's own rules. The turn-based surface
    /// always sets this; it is relaxed only when re-deriving visibility
    /// after a hide action.
    pub treat_empty_as_required: bool,
}

impl ValidationOptions {
    /// Options for the conversational per-turn surface.
    pub fn turn_based() -> Self {
        Self {
            mode: ValidationMode::FirstFailure,
            treat_empty_as_required: true,
        }
    }

    /// Options for the wizard's whole-step batch surface.
    pub fn batch() -> Self {
        Self {
            mode: ValidationMode::CollectAll,
            treat_empty_as_required: true,
        }
    }

    /// Allows blank answers through unvalidated.
    pub fn allow_empty(mut self) -> Self {
        self.treat_empty_as_required = false;
        self
    }
}

/// Pure validation over one field definition.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Validates a raw answer, returning the normalized value or the error
    /// messages a user should see.
    ///
    /// Type-specific normalization runs first and independently of custom
    /// rules; a type failure short-circuits. Custom rules then run in list
    /// order against the normalized value, honoring [`ValidationOptions`].
    pub fn validate(
        raw: &str,
        field: &FieldDefinition,
        opts: ValidationOptions,
    ) -> Result<String, Vec<String>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if opts.treat_empty_as_required {
                return Err(vec!["This field is required".to_string()]);
            }
            return Ok(String::new());
        }

        let normalized = Self::normalize(trimmed, field).map_err(|message| vec![message])?;

        let mut errors = Vec::new();
        for rule in &field.validation_rules {
            if let Some(message) = Self::check_rule(&normalized, rule) {
                errors.push(message);
                if opts.mode == ValidationMode::FirstFailure {
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }

    /// Type-specific normalization of a non-blank, trimmed answer.
    fn normalize(trimmed: &str, field: &FieldDefinition) -> Result<String, String> {
        match field.field_type {
            FieldType::Text | FieldType::Textarea => Ok(trimmed.to_string()),
            FieldType::Email => {
                if EMAIL_RE.is_match(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err("Please enter a valid email address".to_string())
                }
            }
            // Stored as the re-stringified parse so downstream branching
            // comparisons are numeric-safe ("007" becomes "7").
            FieldType::Number => trimmed
                .parse::<f64>()
                .map(|n| n.to_string())
                .map_err(|_| "Please enter a valid number".to_string()),
            FieldType::Checkbox => match trimmed.to_lowercase().as_str() {
                "yes" | "true" | "1" => Ok("true".to_string()),
                "no" | "false" | "0" => Ok("false".to_string()),
                _ => Err("Please answer yes or no".to_string()),
            },
            FieldType::Url => url::Url::parse(trimmed)
                .map(|_| trimmed.to_string())
                .map_err(|_| "Please enter a valid URL".to_string()),
            FieldType::Select => Ok(canonicalize_option(trimmed, &field.options)),
            FieldType::MultiSelect => Ok(trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| canonicalize_option(item, &field.options))
                .collect::<Vec<_>>()
                .join(", ")),
            FieldType::Date => parse_date(trimmed)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .ok_or_else(|| "Please enter a valid date".to_string()),
        }
    }

    /// Evaluates one custom rule, returning the failure message if it fails.
    fn check_rule(value: &str, rule: &ValidationRule) -> Option<String> {
        match rule.kind {
            ValidationRuleKind::Required => {
                fail_if(value.trim().is_empty(), rule, || {
                    "This field is required".to_string()
                })
            }
            ValidationRuleKind::Min => match rule.value_number() {
                Some(min) => fail_if(value.chars().count() < min as usize, rule, || {
                    format!("Must be at least {} characters", min as usize)
                }),
                None => Some(invalid_rule_value(rule)),
            },
            ValidationRuleKind::Max => match rule.value_number() {
                Some(max) => fail_if(value.chars().count() > max as usize, rule, || {
                    format!("Must be at most {} characters", max as usize)
                }),
                None => Some(invalid_rule_value(rule)),
            },
            ValidationRuleKind::Contains => {
                let operand = rule.value_text().unwrap_or_default();
                fail_if(!contains(value, &operand, rule.case_sensitive), rule, || {
                    format!("Must contain \"{}\"", operand)
                })
            }
            ValidationRuleKind::NotContains => {
                let operand = rule.value_text().unwrap_or_default();
                fail_if(
                    !operand.is_empty() && contains(value, &operand, rule.case_sensitive),
                    rule,
                    || format!("Must not contain \"{}\"", operand),
                )
            }
            ValidationRuleKind::Regex => {
                let pattern = rule.value_text().unwrap_or_default();
                match Regex::new(&pattern) {
                    Ok(re) => fail_if(!re.is_match(value), rule, || "Invalid format".to_string()),
                    // A malformed admin-authored pattern is a validation
                    // failure, never a panic.
                    Err(_) => Some("Invalid regex pattern in validation rule".to_string()),
                }
            }
            ValidationRuleKind::Email => fail_if(!EMAIL_RE.is_match(value), rule, || {
                "Please enter a valid email address".to_string()
            }),
            ValidationRuleKind::Url => {
                fail_if(url::Url::parse(value).is_err(), rule, || {
                    "Please enter a valid URL".to_string()
                })
            }
            ValidationRuleKind::Numeric => {
                fail_if(value.trim().parse::<f64>().is_err(), rule, || {
                    "Must be a number".to_string()
                })
            }
            ValidationRuleKind::GreaterThan => match rule.value_number() {
                Some(threshold) => match value.trim().parse::<f64>() {
                    Ok(n) => fail_if(n <= threshold, rule, || {
                        format!("Must be greater than {}", threshold)
                    }),
                    Err(_) => Some(message_or(rule, || {
                        format!("Must be a number greater than {}", threshold)
                    })),
                },
                None => Some(invalid_rule_value(rule)),
            },
            ValidationRuleKind::LessThan => match rule.value_number() {
                Some(threshold) => match value.trim().parse::<f64>() {
                    Ok(n) => fail_if(n >= threshold, rule, || {
                        format!("Must be less than {}", threshold)
                    }),
                    Err(_) => Some(message_or(rule, || {
                        format!("Must be a number less than {}", threshold)
                    })),
                },
                None => Some(invalid_rule_value(rule)),
            },
            ValidationRuleKind::Equals => {
                let operand = rule.value_text().unwrap_or_default();
                fail_if(!equals(value, &operand, rule.case_sensitive), rule, || {
                    format!("Must equal \"{}\"", operand)
                })
            }
            ValidationRuleKind::NotEquals => {
                let operand = rule.value_text().unwrap_or_default();
                fail_if(equals(value, &operand, rule.case_sensitive), rule, || {
                    format!("Must not equal \"{}\"", operand)
                })
            }
            ValidationRuleKind::Empty => fail_if(!value.trim().is_empty(), rule, || {
                "Must be empty".to_string()
            }),
            ValidationRuleKind::NotEmpty => fail_if(value.trim().is_empty(), rule, || {
                "Must not be empty".to_string()
            }),
            ValidationRuleKind::Unknown => {
                tracing::warn!("skipping validation rule with unknown kind");
                None
            }
        }
    }
}

fn fail_if(
    failed: bool,
    rule: &ValidationRule,
    default: impl FnOnce() -> String,
) -> Option<String> {
    if failed {
        Some(message_or(rule, default))
    } else {
        None
    }
}

fn message_or(rule: &ValidationRule, default: impl FnOnce() -> String) -> String {
    rule.message.clone().unwrap_or_else(default)
}

fn invalid_rule_value(rule: &ValidationRule) -> String {
    message_or(rule, || "Invalid value in validation rule".to_string())
}

fn contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

fn equals(left: &str, right: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        left == right
    } else {
        left.to_lowercase() == right.to_lowercase()
    }
}

/// Case-insensitive match against the option list stores the canonically
/// cased option; no match keeps the user's text (the option list is a hint,
/// not an enforced enum).
fn canonicalize_option(input: &str, options: &[String]) -> String {
    options
        .iter()
        .find(|opt| opt.eq_ignore_ascii_case(input))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Some(d);
        }
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::FieldDefinition;
    use proptest::prelude::*;

    fn field(field_type: FieldType) -> FieldDefinition {
        FieldDefinition::new("answer", "Answer", field_type)
    }

    fn turn(raw: &str, field: &FieldDefinition) -> Result<String, Vec<String>> {
        ValidationEngine::validate(raw, field, ValidationOptions::turn_based())
    }

    // ───────────────────────────────────────────────────────────────
    // Empty handling
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn blank_answer_is_rejected_by_default() {
        let errors = turn("   ", &field(FieldType::Text)).unwrap_err();
        assert_eq!(errors, vec!["This field is required"]);
    }

    #[test]
    fn blank_answer_passes_when_empty_allowed() {
        let opts = ValidationOptions::turn_based().allow_empty();
        let normalized = ValidationEngine::validate("", &field(FieldType::Email), opts).unwrap();
        assert_eq!(normalized, "");
    }

    // ───────────────────────────────────────────────────────────────
    // Type normalization
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn email_accepts_plausible_addresses() {
        assert_eq!(turn("a@b.com", &field(FieldType::Email)).unwrap(), "a@b.com");
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for raw in ["not-an-email", "a@b", "a b@c.com", "@c.com"] {
            let errors = turn(raw, &field(FieldType::Email)).unwrap_err();
            assert_eq!(errors, vec!["Please enter a valid email address"], "{raw}");
        }
    }

    #[test]
    fn number_is_canonicalized_to_restringified_parse() {
        assert_eq!(turn("007", &field(FieldType::Number)).unwrap(), "7");
        assert_eq!(turn("3.50", &field(FieldType::Number)).unwrap(), "3.5");
        assert_eq!(turn("-2", &field(FieldType::Number)).unwrap(), "-2");
    }

    #[test]
    fn number_rejects_non_numeric_input() {
        let errors = turn("seven", &field(FieldType::Number)).unwrap_err();
        assert_eq!(errors, vec!["Please enter a valid number"]);
    }

    #[test]
    fn select_matches_options_case_insensitively() {
        let f = field(FieldType::Select).with_options(vec!["Yes", "No"]);
        assert_eq!(turn("yes", &f).unwrap(), "Yes");
        assert_eq!(turn("NO", &f).unwrap(), "No");
    }

    #[test]
    fn select_keeps_free_text_when_no_option_matches() {
        let f = field(FieldType::Select).with_options(vec!["Red", "Blue"]);
        assert_eq!(turn("Maybe", &f).unwrap(), "Maybe");
    }

    #[test]
    fn multiselect_canonicalizes_each_item() {
        let f = field(FieldType::MultiSelect).with_options(vec!["Email", "SMS", "Push"]);
        assert_eq!(turn("email,  push", &f).unwrap(), "Email, Push");
    }

    #[test]
    fn checkbox_accepts_the_six_boolean_spellings() {
        let f = field(FieldType::Checkbox);
        for truthy in ["yes", "YES", "true", "1"] {
            assert_eq!(turn(truthy, &f).unwrap(), "true", "{truthy}");
        }
        for falsy in ["no", "False", "0"] {
            assert_eq!(turn(falsy, &f).unwrap(), "false", "{falsy}");
        }
    }

    #[test]
    fn checkbox_rejects_anything_else() {
        let errors = turn("maybe", &field(FieldType::Checkbox)).unwrap_err();
        assert_eq!(errors, vec!["Please answer yes or no"]);
    }

    #[test]
    fn url_requires_a_parseable_absolute_url() {
        let f = field(FieldType::Url);
        assert!(turn("https://example.com/x", &f).is_ok());
        assert!(turn("not a url", &f).is_err());
    }

    #[test]
    fn date_normalizes_to_iso() {
        let f = field(FieldType::Date);
        assert_eq!(turn("2024-03-01", &f).unwrap(), "2024-03-01");
        assert_eq!(turn("03/01/2024", &f).unwrap(), "2024-03-01");
        assert_eq!(turn("25/12/2024", &f).unwrap(), "2024-12-25");
    }

    #[test]
    fn date_rejects_impossible_calendar_dates() {
        let f = field(FieldType::Date);
        assert!(turn("2024-02-30", &f).is_err());
        assert!(turn("soon", &f).is_err());
    }

    // ───────────────────────────────────────────────────────────────
    // Custom rules and modes
    // ───────────────────────────────────────────────────────────────

    fn min_and_contains_field() -> FieldDefinition {
        field(FieldType::Text).with_validation_rules(vec![
            ValidationRule::with_number(ValidationRuleKind::Min, 5.0),
            ValidationRule::with_text(ValidationRuleKind::Contains, "x"),
        ])
    }

    #[test]
    fn first_failure_mode_stops_at_first_failing_rule() {
        let errors = ValidationEngine::validate(
            "ab",
            &min_and_contains_field(),
            ValidationOptions::turn_based(),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Must be at least 5 characters"]);
    }

    #[test]
    fn collect_all_mode_accumulates_every_failure() {
        let errors =
            ValidationEngine::validate("ab", &min_and_contains_field(), ValidationOptions::batch())
                .unwrap_err();
        assert_eq!(
            errors,
            vec!["Must be at least 5 characters", "Must contain \"x\""]
        );
    }

    #[test]
    fn rules_run_against_the_normalized_value() {
        // "007" normalizes to "7" before greater_than sees it.
        let f = field(FieldType::Number).with_validation_rules(vec![ValidationRule::with_number(
            ValidationRuleKind::GreaterThan,
            5.0,
        )]);
        assert_eq!(turn("007", &f).unwrap(), "7");

        let errors = turn("003", &f).unwrap_err();
        assert_eq!(errors, vec!["Must be greater than 5"]);
    }

    #[test]
    fn string_comparisons_default_to_case_insensitive() {
        let f = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_text(
            ValidationRuleKind::Equals,
            "Madrid",
        )]);
        assert!(turn("madrid", &f).is_ok());

        let strict = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_text(
            ValidationRuleKind::Equals,
            "Madrid",
        )
        .case_sensitive()]);
        assert!(turn("madrid", &strict).is_err());
        assert!(turn("Madrid", &strict).is_ok());
    }

    #[test]
    fn invalid_regex_pattern_is_a_validation_failure_not_a_panic() {
        let f = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_text(
            ValidationRuleKind::Regex,
            "([unclosed",
        )]);
        let errors = turn("anything", &f).unwrap_err();
        assert_eq!(errors, vec!["Invalid regex pattern in validation rule"]);
    }

    #[test]
    fn regex_rule_matches_the_value() {
        let f = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_text(
            ValidationRuleKind::Regex,
            r"^\d{4}$",
        )]);
        assert!(turn("1234", &f).is_ok());
        assert!(turn("12345", &f).is_err());
    }

    #[test]
    fn admin_message_overrides_built_in_text() {
        let f = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_number(
            ValidationRuleKind::Min,
            10.0,
        )
        .message("Tell us a bit more")]);
        let errors = turn("short", &f).unwrap_err();
        assert_eq!(errors, vec!["Tell us a bit more"]);
    }

    #[test]
    fn unknown_rule_kind_is_skipped() {
        let f = field(FieldType::Text)
            .with_validation_rules(vec![ValidationRule::new(ValidationRuleKind::Unknown)]);
        assert!(turn("anything", &f).is_ok());
    }

    #[test]
    fn min_with_missing_operand_degrades_to_failure() {
        let f = field(FieldType::Text)
            .with_validation_rules(vec![ValidationRule::new(ValidationRuleKind::Min)]);
        let errors = turn("anything", &f).unwrap_err();
        assert_eq!(errors, vec!["Invalid value in validation rule"]);
    }

    #[test]
    fn greater_than_on_non_numeric_value_fails() {
        let f = field(FieldType::Text).with_validation_rules(vec![ValidationRule::with_number(
            ValidationRuleKind::GreaterThan,
            3.0,
        )]);
        let errors = turn("abc", &f).unwrap_err();
        assert_eq!(errors, vec!["Must be a number greater than 3"]);
    }

    proptest! {
        // Canonicalization never changes the numeric value, only its spelling.
        #[test]
        fn number_normalization_preserves_value(n in -1.0e9f64..1.0e9f64) {
            let raw = format!("{n}");
            let normalized = turn(&raw, &field(FieldType::Number)).unwrap();
            let reparsed: f64 = normalized.parse().unwrap();
            prop_assert!((reparsed - n).abs() <= f64::EPSILON * n.abs().max(1.0));
        }
    }
}
