//! FieldType enum - the closed set of question types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of an onboarding question.
///
/// Drives type-specific normalization in the validation engine. Stored
/// definitions may carry values authored by older tooling; use
/// [`FieldType::parse_lenient`] when reading from storage so an unknown
/// type degrades to `Text` instead of failing the whole catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Number,
    #[serde(alias = "boolean")]
    Checkbox,
    Url,
    Select,
    #[serde(rename = "multiselect")]
    MultiSelect,
    Textarea,
    Date,
}

impl FieldType {
    /// Returns the canonical storage string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Url => "url",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
        }
    }

    /// Parses a stored type string, degrading unknown values to `Text`.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            "checkbox" | "boolean" => FieldType::Checkbox,
            "url" => FieldType::Url,
            "select" => FieldType::Select,
            "multiselect" => FieldType::MultiSelect,
            "textarea" => FieldType::Textarea,
            "date" => FieldType::Date,
            other => {
                tracing::warn!(field_type = other, "unknown field type, treating as text");
                FieldType::Text
            }
        }
    }

    /// Returns true for types whose definitions carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_snake_case_json() {
        let json = serde_json::to_string(&FieldType::MultiSelect).unwrap();
        assert_eq!(json, "\"multiselect\"");

        let json = serde_json::to_string(&FieldType::Checkbox).unwrap();
        assert_eq!(json, "\"checkbox\"");
    }

    #[test]
    fn deserializes_boolean_alias_as_checkbox() {
        let ft: FieldType = serde_json::from_str("\"boolean\"").unwrap();
        assert_eq!(ft, FieldType::Checkbox);
    }

    #[test]
    fn parse_lenient_roundtrips_all_canonical_strings() {
        for ft in [
            FieldType::Text,
            FieldType::Email,
            FieldType::Number,
            FieldType::Checkbox,
            FieldType::Url,
            FieldType::Select,
            FieldType::MultiSelect,
            FieldType::Textarea,
            FieldType::Date,
        ] {
            assert_eq!(FieldType::parse_lenient(ft.as_str()), ft);
        }
    }

    #[test]
    fn parse_lenient_degrades_unknown_to_text() {
        assert_eq!(FieldType::parse_lenient("hologram"), FieldType::Text);
    }

    #[test]
    fn has_options_only_for_select_types() {
        assert!(FieldType::Select.has_options());
        assert!(FieldType::MultiSelect.has_options());
        assert!(!FieldType::Text.has_options());
        assert!(!FieldType::Checkbox.has_options());
    }
}
