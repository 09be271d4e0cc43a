//! Accumulated outcome of a reconciliation run.

use std::fmt;

use crate::error::{Result, SyncError};

/// A structural change that was applied (or recorded, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A table was created.
    CreateTable {
        /// Table name.
        table: String,
        /// The CREATE TABLE statement.
        sql: String,
    },
    /// A column was added to an existing table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// The ALTER TABLE statement.
        sql: String,
    },
    /// An index was created.
    CreateIndex {
        /// Table name.
        table: String,
        /// Index name.
        name: String,
        /// Indexed columns.
        columns: Vec<String>,
        /// Whether the index is unique.
        unique: bool,
    },
}

impl fmt::Display for Applied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { table, .. } => write!(f, "+ table {table}"),
            Self::AddColumn { table, column, .. } => write!(f, "+ column {table}.{column}"),
            Self::CreateIndex {
                table,
                name,
                columns,
                unique,
            } => {
                let kind = if *unique { "unique index" } else { "index" };
                write!(f, "+ {kind} {name} on {table} ({})", columns.join(", "))
            }
        }
    }
}

/// Changes applied and errors collected while reconciling one or more tables.
///
/// A failed step never stops the independent steps after it, so a report can
/// hold both applied changes and errors.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Applied changes, in execution order.
    pub applied: Vec<Applied>,
    /// Errors, in the order they occurred.
    pub errors: Vec<SyncError>,
}

impl SyncReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an applied change.
    pub fn record(&mut self, change: Applied) {
        self.applied.push(change);
    }

    /// Records an error.
    pub fn fail(&mut self, error: SyncError) {
        self.errors.push(error);
    }

    /// Appends everything from `other`.
    pub fn merge(&mut self, other: Self) {
        self.applied.extend(other.applied);
        self.errors.extend(other.errors);
    }

    /// Returns true if no error was recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if nothing was applied and nothing failed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.errors.is_empty()
    }

    /// Returns true if a table was created.
    #[must_use]
    pub fn created_table(&self) -> bool {
        self.applied
            .iter()
            .any(|change| matches!(change, Applied::CreateTable { .. }))
    }

    /// Converts the report into a `Result`, failing if any error was recorded.
    pub fn into_result(mut self) -> Result<Vec<Applied>> {
        match self.errors.len() {
            0 => Ok(self.applied),
            1 => Err(self.errors.remove(0)),
            _ => Err(SyncError::Multiple(self.errors)),
        }
    }
}
