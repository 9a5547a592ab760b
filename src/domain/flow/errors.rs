//! Onboarding flow error types.

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors surfaced by the flow operations.
///
/// Expected user-input problems (validation failures, unknown field keys)
/// are values the caller re-prompts on; only infrastructure failures are
/// exceptional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    /// The field key is not enabled for this campaign.
    UnknownField { field_key: String },
    /// One or more rules rejected the answer.
    ValidationFailed {
        field_key: String,
        messages: Vec<String>,
    },
    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl OnboardingError {
    pub fn unknown_field(field_key: impl Into<String>) -> Self {
        OnboardingError::UnknownField {
            field_key: field_key.into(),
        }
    }

    pub fn validation(field_key: impl Into<String>, messages: Vec<String>) -> Self {
        OnboardingError::ValidationFailed {
            field_key: field_key.into(),
            messages,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        OnboardingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            OnboardingError::UnknownField { .. } => ErrorCode::UnknownField,
            OnboardingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            OnboardingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// One human-readable line for the conversational surface.
    pub fn message(&self) -> String {
        match self {
            OnboardingError::UnknownField { .. } => "Invalid field".to_string(),
            OnboardingError::ValidationFailed { messages, .. } => messages
                .first()
                .cloned()
                .unwrap_or_else(|| "Invalid answer".to_string()),
            OnboardingError::Infrastructure(_) => "Something went wrong".to_string(),
        }
    }
}

impl std::fmt::Display for OnboardingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnboardingError::UnknownField { field_key } => {
                write!(f, "Field '{}' is not enabled for this campaign", field_key)
            }
            OnboardingError::ValidationFailed { field_key, messages } => {
                write!(f, "Validation failed for '{}': {}", field_key, messages.join("; "))
            }
            OnboardingError::Infrastructure(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for OnboardingError {}

impl From<DomainError> for OnboardingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UnknownField => OnboardingError::UnknownField {
                field_key: err
                    .details
                    .get("field_key")
                    .cloned()
                    .unwrap_or_default(),
            },
            ErrorCode::ValidationFailed => OnboardingError::ValidationFailed {
                field_key: err.details.get("field_key").cloned().unwrap_or_default(),
                messages: vec![err.message],
            },
            _ => OnboardingError::Infrastructure(err.to_string()),
        }
    }
}
