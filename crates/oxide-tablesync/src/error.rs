//! Error types for table reconciliation.

use std::path::PathBuf;

/// Errors that can occur while reconciling a table.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The rule cannot be reconciled as written.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A DDL statement was rejected by the database.
    #[error("Statement failed: {sql}: {source}")]
    Statement {
        /// The statement that failed.
        sql: String,
        /// The underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// An index could not be created.
    #[error("Failed to create index '{name}' on '{table}': {source}")]
    Index {
        /// Table the index belongs to.
        table: String,
        /// Index name.
        name: String,
        /// The underlying error.
        #[source]
        source: Box<SyncError>,
    },

    /// Database error while reading the catalog.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading rule files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a rule file.
    #[error("Failed to parse rule file '{path}': {source}")]
    RuleFile {
        /// Path to the rule file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Multiple errors occurred.
    #[error("Multiple errors occurred:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Multiple(Vec<SyncError>),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, SyncError>;
