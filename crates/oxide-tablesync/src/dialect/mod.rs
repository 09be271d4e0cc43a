//! Database dialect implementations.
//!
//! Each dialect knows how to quote identifiers, name indexes and which
//! column clauses and table options a freshly created table receives.

mod mysql;
mod sqlite;

use std::sync::LazyLock;

use regex::Regex;

pub use mysql::MySqlDialect;
pub use sqlite::SqliteDialect;

use crate::index::IndexKind;

static KEY_NAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]+").expect("key name pattern is valid"));

/// Replaces every run of non-alphanumeric characters with `_`.
#[must_use]
pub fn sanitize_key_name(name: &str) -> String {
    KEY_NAME_UNSAFE.replace_all(name, "_").into_owned()
}

/// Builds `<prefix>_<table>_<column>`, sanitized.
#[must_use]
pub fn conventional_index_name(kind: IndexKind, table: &str, column: &str) -> String {
    sanitize_key_name(&format!("{}_{}_{}", kind.prefix(), table, column))
}

/// Trait for database-specific SQL generation.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Returns the name used for an index requested with the sentinel token.
    fn index_name(&self, kind: IndexKind, table: &str, column: &str) -> String {
        conventional_index_name(kind, table, column)
    }

    /// Column clause of the `id` column injected into new tables.
    fn id_column_clause(&self) -> &'static str;

    /// Column clause of the `created_at` column injected into new tables.
    fn created_at_column_clause(&self) -> &'static str {
        "datetime NOT NULL DEFAULT CURRENT_TIMESTAMP"
    }

    /// Table options used when a rule does not provide any.
    fn default_table_options(&self) -> &'static str;

    /// Generates SQL for creating an index.
    fn create_index_sql(
        &self,
        name: &str,
        table: &str,
        columns: &[String],
        unique: bool,
    ) -> String {
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote_identifier(name));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");

        let quoted: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        sql.push_str(&quoted.join(", "));
        sql.push(')');
        sql
    }
}
