//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Catalog, Executor};
use crate::dialect::{MigrationDialect, MySqlDialect};
use crate::error::{Result, SyncError};

#[derive(Debug, Default)]
struct LiveTable {
    columns: HashSet<String>,
    indexes: HashSet<String>,
}

/// A fixed catalog snapshot using the MySQL dialect.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    dialect: MySqlDialect,
    tables: HashMap<String, LiveTable>,
    failing_columns: HashSet<String>,
    failing_indexes: HashSet<String>,
    failing_tables: bool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str, columns: &[&str], indexes: &[&str]) -> Self {
        self.tables.insert(
            name.to_string(),
            LiveTable {
                columns: columns.iter().map(ToString::to_string).collect(),
                indexes: indexes.iter().map(ToString::to_string).collect(),
            },
        );
        self
    }

    pub fn failing_column(mut self, column: &str) -> Self {
        self.failing_columns.insert(column.to_string());
        self
    }

    pub fn failing_index(mut self, name: &str) -> Self {
        self.failing_indexes.insert(name.to_string());
        self
    }

    pub fn failing_tables(mut self) -> Self {
        self.failing_tables = true;
        self
    }
}

fn lost_connection() -> SyncError {
    SyncError::Database(sqlx::Error::Protocol("connection lost".to_string()))
}

impl Catalog for FakeCatalog {
    type Dialect = MySqlDialect;

    fn dialect(&self) -> &MySqlDialect {
        &self.dialect
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        if self.failing_tables {
            return Err(lost_connection());
        }
        Ok(self.tables.contains_key(table))
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        if self.failing_columns.contains(column) {
            return Err(lost_connection());
        }
        Ok(self
            .tables
            .get(table)
            .is_some_and(|t| t.columns.contains(column)))
    }

    async fn has_index(&self, table: &str, name: &str) -> Result<bool> {
        if self.failing_indexes.contains(name) {
            return Err(lost_connection());
        }
        Ok(self
            .tables
            .get(table)
            .is_some_and(|t| t.indexes.contains(name)))
    }
}

/// An executor that rejects chosen statements and index names.
#[derive(Debug, Default)]
pub struct RejectingExecutor {
    dialect: MySqlDialect,
    rejected: HashSet<String>,
    attempts: std::sync::Mutex<Vec<String>>,
}

impl RejectingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects statements containing `needle` and indexes named `needle`.
    pub fn reject(mut self, needle: &str) -> Self {
        self.rejected.insert(needle.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn attempt(&self, sql: String, key: &str) -> Result<()> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(sql.clone());
        }
        if self.rejected.iter().any(|needle| key.contains(needle.as_str())) {
            return Err(SyncError::Statement {
                sql,
                source: sqlx::Error::Protocol("rejected".to_string()),
            });
        }
        Ok(())
    }
}

impl Executor for RejectingExecutor {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.attempt(sql.to_string(), sql)
    }

    async fn add_index(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        unique: bool,
    ) -> Result<()> {
        let sql = self.dialect.create_index_sql(name, table, columns, unique);
        self.attempt(sql, name)
    }
}
