//! # AppError
//!
//! Centralized error handling for the Quadboard ecosystem.
//! Maps domain-specific failures to actionable error types; the HTTP layer
//! owns the status-code mapping.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Post, Comment, parent Comment). Also used
    /// when campus scoping hides an entity from the requester.
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Validation failure (e.g., title too long, vote value outside {-1,0,1})
    #[error("validation error: {0}")]
    Validation(String),

    /// No or invalid session
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed (e.g., deleting someone else's post)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Underlying persistence failure (DB down, constraint violation, ...)
    #[error("store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AppError::NotFound(kind, id.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Store(Box::new(err))
    }
}

/// A specialized Result type for Quadboard logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_id() {
        let err = AppError::not_found("post", "abc");
        assert_eq!(err.to_string(), "post not found with ID abc");
    }

    #[test]
    fn validation_message_passes_through() {
        let err = AppError::validation("title must be 1-200 characters");
        assert!(err.to_string().contains("title must be 1-200"));
    }
}
