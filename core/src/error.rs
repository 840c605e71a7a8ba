//! Error types for todo storage.
//!
//! # Design
//! Only storage faults are errors. Validation failures and missing records are
//! expected outcomes and travel as `dispatch::Outcome` values instead, so a
//! `StoreError` reaching the transport layer always means "server fault".

use std::path::PathBuf;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a `TodoStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },

    /// A record violates a storage constraint such as a length limit.
    #[error("constraint violation on {field}: {reason}")]
    Constraint { field: &'static str, reason: String },

    #[error("invalid persisted todo data: {0}")]
    InvalidData(String),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("storage task failed: {0}")]
    Task(String),

    #[error("failed to prepare storage directory `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_message_names_field() {
        let err = StoreError::Constraint {
            field: "title",
            reason: "exceeds 100 characters".to_string(),
        };
        assert_eq!(err.to_string(), "constraint violation on title: exceeds 100 characters");
    }

    #[test]
    fn schema_version_message_reports_both_versions() {
        let err = StoreError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "database schema version 9 is newer than supported 1"
        );
    }
}
