//! Error types for the kanban engine

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type for kanban operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in kanban operations.
///
/// Every error aborts the in-flight store transaction before it reaches the
/// caller; no operation ever reports a partially applied result.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Malformed or missing parameters
    #[error("invalid request: {message}")]
    Validation { message: String },

    /// Referenced entity does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Caller's workspace membership does not cover the target
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// No session, expired session, or bad credentials
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Unique value already taken
    #[error("{resource} already exists: {id}")]
    AlreadyExists { resource: String, id: String },

    /// Store reported a transaction conflict; retry from a fresh read
    #[error("transaction conflict: {message}")]
    Conflict { message: String },

    /// Unexpected store failure
    #[error("store error: {0}")]
    Store(rusqlite::Error),

    /// Password hashing failure
    #[error("password hashing failed: {message}")]
    Password { message: String },

    /// Blocking store task panicked or was cancelled
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an already-exists error
    pub fn already_exists(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Trim a required text field, rejecting it when nothing is left
pub(crate) fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

impl From<rusqlite::Error> for BoardError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => Self::Conflict {
                message: err.to_string(),
            },
            _ => Self::Store(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::not_found("task", "abc123");
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_validation_error() {
        let err = BoardError::validation("title is required");
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  Done ", "name").unwrap(), "Done");
        let err = required("   ", "title").unwrap_err();
        assert_eq!(err.to_string(), "invalid request: title is required");
    }

    #[test]
    fn test_retryable() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".into()),
        );
        let err = BoardError::from(busy);
        assert!(matches!(err, BoardError::Conflict { .. }));
        assert!(err.is_retryable());

        assert!(!BoardError::forbidden("no").is_retryable());
        assert!(!BoardError::from(rusqlite::Error::QueryReturnedNoRows).is_retryable());
    }

    #[test]
    fn test_constraint_violation_is_store_error() {
        let constraint = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        assert!(matches!(BoardError::from(constraint), BoardError::Store(_)));
    }
}
