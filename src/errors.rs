//! Unified application error type.
//! Every layer (storage, core, cli, export) returns AppError so callers can
//! tell permission and validation failures apart from benign races.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Unsupported record format version: {0}")]
    UnsupportedRecord(i64),

    #[error("Storage lock poisoned: {0}")]
    Poisoned(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    // ---------------------------
    // Timer / ledger logic
    // ---------------------------
    #[error("No timer is running for user {0}")]
    NotRunning(String),

    #[error("A timer is already running for user {0}")]
    AlreadyRunning(String),

    #[error("Permission denied: {0} requires the admin role")]
    PermissionDenied(String),

    #[error("Invalid interval: end {end} is before start {start}")]
    InvalidInterval { start: i64, end: i64 },

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Time log {0} not found")]
    NotFound(i64),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("No acting user: pass --as <USER_ID> or set default_user in the config")]
    NoActingUser,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors that describe a lost race rather than a failure.
    /// A stop that finds the timer already closed is one of them.
    pub fn is_benign(&self) -> bool {
        matches!(self, AppError::NotRunning(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_running_is_benign() {
        assert!(AppError::NotRunning("u1".into()).is_benign());
        assert!(!AppError::PermissionDenied("force stop".into()).is_benign());
        assert!(!AppError::InvalidInterval { start: 2, end: 1 }.is_benign());
        assert!(!AppError::NotFound(3).is_benign());
    }

    #[test]
    fn messages_name_the_subject() {
        let e = AppError::InvalidInterval { start: 10, end: 5 };
        assert_eq!(e.to_string(), "Invalid interval: end 5 is before start 10");
        let e = AppError::PermissionDenied("delete time log".into());
        assert!(e.to_string().contains("delete time log"));
    }
}
