//! SQLite dialect.
//!
//! SQLite has no `AUTO_INCREMENT` or table options, so new tables get an
//! `INTEGER` id (a rowid alias once it is the sole primary key) and no
//! trailing options.

use super::MigrationDialect;

/// SQLite migration dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MigrationDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn id_column_clause(&self) -> &'static str {
        "INTEGER NOT NULL"
    }

    fn default_table_options(&self) -> &'static str {
        ""
    }
}
