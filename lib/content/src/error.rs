//! Error types for the content crate.

use std::fmt;

/// Errors from content validation and storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// A request field failed validation.
    Invalid { field: &'static str, reason: String },
    /// The backing store could not complete the operation.
    StorageFailed { operation: &'static str, reason: String },
}

impl ContentError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub fn storage(operation: &'static str, reason: impl fmt::Display) -> Self {
        Self::StorageFailed {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Returns true for validation failures, which callers report as bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
            Self::StorageFailed { operation, reason } => {
                write!(f, "failed to {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for ContentError {}
