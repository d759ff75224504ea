//! Error types for the migration runner.

use thiserror::Error;
use tm_core::{ChangeSetId, CoreError};
use tm_db::DbError;

/// Migration runner errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Store unreachable or ledger setup failed (M001).
    #[error("[M001] Database connection failed: {0}")]
    Connection(#[source] DbError),

    /// Change-set store could not be read or written (M002).
    #[error("[M002] Change-set store error: {0}")]
    Store(#[from] CoreError),

    /// Referenced ledger record does not exist (M003).
    #[error("[M003] No ledger record for change-set: {identifier}")]
    NotFound { identifier: ChangeSetId },

    /// Ledger already holds a record for this change-set (M004).
    #[error("[M004] Change-set already recorded as applied: {identifier} ({source})")]
    Conflict {
        identifier: ChangeSetId,
        source: DbError,
    },

    /// A forward statement failed; the change-set was not recorded (M005).
    #[error("[M005] Migration {identifier} failed: {source}")]
    Migration {
        identifier: ChangeSetId,
        source: DbError,
    },

    /// A rollback statement failed; the ledger was left untouched (M006).
    #[error("[M006] Rollback of {identifier} failed, ledger left unchanged: {source}")]
    Rollback {
        identifier: ChangeSetId,
        source: DbError,
    },

    /// Rollback requested but no rollback script was authored (M007).
    #[error("[M007] No rollback script for {identifier}: create {file_name} with the inverse statements")]
    MissingRollback {
        identifier: ChangeSetId,
        file_name: String,
    },

    /// Ledger read or write failed (M008).
    #[error("[M008] Ledger query failed: {0}")]
    Ledger(#[source] DbError),

    /// Ledger row could not be mapped to a record (M009).
    #[error("[M009] Malformed ledger row: {0}")]
    InvalidRecord(String),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Identifier of the change-set this error concerns, when there is one.
    pub fn change_set(&self) -> Option<&ChangeSetId> {
        match self {
            MigrateError::NotFound { identifier }
            | MigrateError::Conflict { identifier, .. }
            | MigrateError::Migration { identifier, .. }
            | MigrateError::Rollback { identifier, .. }
            | MigrateError::MissingRollback { identifier, .. } => Some(identifier),
            _ => None,
        }
    }
}
