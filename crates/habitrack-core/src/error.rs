//! Core error types for habitrack-core.
//!
//! Validation of a completion past the day's target is *not* an error; the
//! recorder reports it through a flag. The types here cover the cases that are
//! surfaced to callers: store failures, invalid input and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// No user is signed in
    #[error("No user is signed in")]
    NotAuthenticated,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`DocumentStore`](crate::store::DocumentStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document does not exist
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// The backend failed to serve the request
    #[error("Backend failure: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded
    #[error("Codec error for {collection}/{id}: {message}")]
    Codec {
        collection: String,
        id: String,
        message: String,
    },

    /// A field path did not address a writable location
    #[error("Invalid field path '{0}'")]
    InvalidPath(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty or blank name
    #[error("Name must not be empty")]
    EmptyName,

    /// Daily target below one
    #[error("Daily target must be at least 1 (got {0})")]
    InvalidDailyTarget(u32),

    /// Weekly habit without active days
    #[error("Weekly habit needs at least one active weekday")]
    NoActiveWeekdays,

    /// Unparseable ISO date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Completion dated after the session's today
    #[error("Cannot record a completion for {date}, which is after {today}")]
    FutureDate { date: String, today: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StoreError::Backend("database is locked".to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
