//! SQLite backend.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::catalog::{Catalog, Executor};
use crate::dialect::{MigrationDialect, SqliteDialect};
use crate::error::{Result, SyncError};

/// Catalog and executor over a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    dialect: SqliteDialect,
}

impl SqliteDatabase {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            dialect: SqliteDialect::new(),
        }
    }

    /// Connects to `url` (e.g. `sqlite:db.sqlite3`), creating the file if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Catalog for SqliteDatabase {
    type Dialect = SqliteDialect;

    fn dialect(&self) -> &SqliteDialect {
        &self.dialect
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
        )
        .bind(table)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM pragma_table_info(?) WHERE name = ? COLLATE NOCASE")
                .bind(table)
                .bind(column)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn has_index(&self, table: &str, name: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM sqlite_master \
             WHERE type = 'index' AND tbl_name = ? COLLATE NOCASE AND name = ? COLLATE NOCASE",
        )
        .bind(table)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }
}

impl Executor for SqliteDatabase {
    async fn execute(&self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|source| SyncError::Statement {
                sql: sql.to_string(),
                source,
            })?;
        Ok(())
    }

    async fn add_index(
        &self,
        table: &str,
        name: &str,
        columns: &[String],
        unique: bool,
    ) -> Result<()> {
        let sql = self.dialect.create_index_sql(name, table, columns, unique);
        self.execute(&sql).await
    }
}
