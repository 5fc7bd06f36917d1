//! Error types for directory requests
//!
//! Remote failures are split the way forms display them:
//! - field errors attach to one input (e.g. an invalid label key)
//! - non-field errors are shown as a list above the form

use serde::{Deserialize, Serialize};

/// Validation error attached to one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Input field name (e.g. `key`, `value`)
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    #[inline]
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a remote query or mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Server rejected the request
    #[error("request rejected: {}", describe(.field_errors, .messages))]
    Rejected {
        /// Errors tied to specific input fields
        field_errors: Vec<FieldError>,
        /// Errors not tied to any field
        messages: Vec<String>,
    },

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Response did not have the expected shape
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

fn describe(field_errors: &[FieldError], messages: &[String]) -> String {
    field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .chain(messages.iter().cloned())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Rejection carrying a single field error
    #[inline]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            field_errors: vec![FieldError::new(field, message)],
            messages: Vec::new(),
        }
    }

    /// Rejection carrying a single non-field message
    #[inline]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            field_errors: Vec::new(),
            messages: vec![message.into()],
        }
    }

    /// Errors attached to input fields
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Rejected { field_errors, .. } => field_errors,
            _ => &[],
        }
    }

    /// Message for one field, if any
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Errors to show outside of any field
    #[must_use]
    pub fn non_field_errors(&self) -> Vec<String> {
        match self {
            Self::Rejected { messages, .. } => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Check if the request may succeed when repeated unchanged
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
