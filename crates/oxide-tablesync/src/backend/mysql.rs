//! MySQL backend.
//!
//! Introspection reads `INFORMATION_SCHEMA` for the connection's current
//! database.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::catalog::{Catalog, Executor};
use crate::dialect::{MigrationDialect, MySqlDialect};
use crate::error::{Result, SyncError};

/// Catalog and executor over a MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
    dialect: MySqlDialect,
}

impl MySqlDatabase {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            dialect: MySqlDialect::new(),
        }
    }

    /// Connects to a `mysql://` URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl Catalog for MySqlDatabase {
    type Dialect = MySqlDialect;

    fn dialect(&self) -> &MySqlDialect {
        &self.dialect
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT count(*) FROM INFORMATION_SCHEMA.TABLES \
             WHERE table_schema = DATABASE() AND table_name = ? AND table_type = 'BASE TABLE'",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT count(*) FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE table_schema = DATABASE() AND table_name = ? AND column_name = ?",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn has_index(&self, table: &str, name: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT count(*) FROM INFORMATION_SCHEMA.STATISTICS \
             WHERE table_schema = DATABASE() AND table_name = ? AND index_name = ?",
        )
        .bind(table)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

impl Executor for MySqlDatabase {
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
