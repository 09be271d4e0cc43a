//! Database capabilities consumed by the reconciliation engine.
//!
//! The engine never talks to a driver directly. It reads live structure
//! through [`Catalog`] and issues DDL through [`Executor`]; the sqlx-backed
//! implementations live in [`crate::backend`].

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::dialect::MigrationDialect;
use crate::error::Result;

/// Read access to the live schema.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Dialect used to quote identifiers and name indexes.
    type Dialect: MigrationDialect;

    /// Returns the dialect.
    fn dialect(&self) -> &Self::Dialect;

    /// Returns whether `table` exists.
    async fn has_table(&self, table: &str) -> Result<bool>;

    /// Returns whether `table` has a column named `column`.
    async fn has_column(&self, table: &str, column: &str) -> Result<bool>;

    /// Returns whether `table` has an index named `name`.
    async fn has_index(&self, table: &str, name: &str) -> Result<bool>;
}

/// Write access: raw statements and index creation.
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Executes one DDL statement.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Creates a (unique) index named `name` on `table` over `columns`.
    async fn add_index(&self, table: &str, name: &str, columns: &[String], unique: bool)
    -> Result<()>;
}

/// A [`Catalog`] for an empty database: no table, column or index exists.
///
/// Paired with [`SqlRecorder`] it yields the full DDL a fresh database
/// would receive, without connecting anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshCatalog<D: MigrationDialect> {
    dialect: D,
}

impl<D: MigrationDialect> FreshCatalog<D> {
    /// Creates a catalog for an empty database of the given dialect.
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }
}

impl<D: MigrationDialect> Catalog for FreshCatalog<D> {
    type Dialect = D;

    fn dialect(&self) -> &D {
        &self.dialect
    }

    async fn has_table(&self, _table: &str) -> Result<bool> {
        Ok(false)
    }

    async fn has_column(&self, _table: &str, _column: &str) -> Result<bool> {
        Ok(false)
    }

    async fn has_index(&self, _table: &str, _name: &str) -> Result<bool> {
        Ok(false)
    }
}

/// An [`Executor`] that records statements instead of running them.
///
/// Used for dry runs: pair it with a real [`Catalog`] to see what a
/// reconciliation would do.
#[derive(Debug, Default)]
pub struct SqlRecorder<D: MigrationDialect> {
    dialect: D,
    statements: Mutex<Vec<String>>,
}

impl<D: MigrationDialect> SqlRecorder<D> {
    /// Creates an empty recorder rendering index DDL with `dialect`.
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Returns the recorded statements, oldest first.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the recorded statements.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .statements
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn record(&self, sql: String) {
        debug!(sql = %sql, "Recording SQL");
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql);
    }
}

impl<D: MigrationDialect> Executor for SqlRecorder<D> {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.record(sql.to_string());
        Ok(())
    }

    async fn add_index(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        unique: bool,
    ) -> Result<()> {
        self.record(self.dialect.create_index_sql(name, table, columns, unique));
        Ok(())
    }
}
