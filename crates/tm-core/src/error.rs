//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Filesystem error with path context
    #[error("[C004] I/O error at {path}: {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C005: Change-set file does not exist in the store
    #[error("[C005] Change-set not found: {identifier} ({path})")]
    ChangeSetNotFound { identifier: String, path: String },

    /// C006: A change-set file with the same identifier is already present
    #[error("[C006] Change-set already exists: {path}")]
    ChangeSetExists { path: String },

    /// C007: Human-supplied change-set name produced an empty slug
    #[error("[C007] Invalid change-set name '{name}': must contain at least one letter or digit")]
    InvalidName { name: String },

    /// C008: Change-set name collides with the rollback file naming convention
    #[error("[C008] Invalid change-set name '{name}': names ending in 'rollback' are reserved for rollback scripts")]
    ReservedName { name: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
