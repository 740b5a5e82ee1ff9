//! Core error types for flashdeck-core.
//!
//! This module defines the error hierarchy using thiserror. Collaborator
//! failures (`FetchError`, `PersistError`) are plain structs so that any
//! storage backend can produce them without depending on the rest of the
//! hierarchy.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flashdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("storage: {0}")]
    Database(#[from] DatabaseError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The session holds its position after this.
    #[error("rating not saved: {0}")]
    Persist(#[from] PersistError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Deck store failures.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("cannot open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("schema migration failed: {0}")]
    MigrationFailed(String),

    /// Referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// SQLite reported `SQLITE_BUSY` or `SQLITE_LOCKED`.
    #[error("database is locked")]
    Locked,
}

/// Config file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("cannot write {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("bad value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

/// Rejected user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rating outside the four confidence levels
    #[error("unknown rating '{0}' (expected again, hard, good, easy or 1-4)")]
    InvalidRating(String),

    /// Empty text where content is required
    #[error("{0} must not be empty")]
    Empty(String),

    #[error("bad value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Structured failure from a fetch collaborator.
///
/// Displays as `"{status}: {message}"` so a presenter can split it back
/// into a heading and a description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct FetchError {
    pub status: u16,
    pub message: String,
}

impl FetchError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

/// Failure reported by a persistence collaborator for one rating update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("card {card_id}: {message}")]
pub struct PersistError {
    pub card_id: i64,
    pub message: String,
}

impl PersistError {
    pub fn new(card_id: i64, message: impl Into<String>) -> Self {
        Self {
            card_id,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode::{DatabaseBusy, DatabaseLocked};
        match err.sqlite_error_code() {
            Some(DatabaseBusy | DatabaseLocked) => DatabaseError::Locked,
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.into())
    }
}

impl From<DatabaseError> for FetchError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => FetchError::not_found(err.to_string()),
            DatabaseError::Locked => FetchError::new(503, err.to_string()),
            other => FetchError::internal(other.to_string()),
        }
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
