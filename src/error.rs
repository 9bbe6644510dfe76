// src/error.rs

use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{kind} code '{code}' already exists")]
    DuplicateCode { kind: &'static str, code: String },

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("Difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error("Unknown tier: {0}")]
    InvalidTier(String),

    #[error("Unknown task status: {0}")]
    InvalidStatus(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        TrackerError::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

/// Turns a UNIQUE violation into `DuplicateCode`, leaves other failures
/// (NOT NULL, CHECK, ...) as `Database`.
pub fn map_unique_violation(err: rusqlite::Error, kind: &'static str, code: &str) -> TrackerError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.code == ErrorCode::ConstraintViolation
            && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        {
            return TrackerError::DuplicateCode {
                kind,
                code: code.to_string(),
            };
        }
    }
    TrackerError::Database(err)
}
