//! Error types for tm-db

use thiserror::Error;

/// Database operation errors
///
/// Every variant carries the driver's original message.
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Object being created already exists (D003)
    #[error("[D003] Object already exists: {0}")]
    AlreadyExists(String),

    /// Unique or primary key constraint violated (D004)
    #[error("[D004] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Internal error (D005)
    #[error("[D005] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether this is the "already exists" condition tolerated during
    /// idempotent schema setup.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, DbError::AlreadyExists(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for catalog or
        // constraint failures, so classify by message. Patterns are narrow:
        // anything unrecognised stays a plain execution error.
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("catalog error") && lower.contains("already exists") {
            DbError::AlreadyExists(msg)
        } else if lower.contains("constraint error")
            && (lower.contains("duplicate key") || lower.contains("unique constraint"))
        {
            DbError::ConstraintViolation(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
