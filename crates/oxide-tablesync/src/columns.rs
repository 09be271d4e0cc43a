//! Column diffing for tables that already exist.

use tracing::warn;

use crate::catalog::Catalog;
use crate::dialect::MigrationDialect;
use crate::report::SyncReport;
use crate::resolve::column_clause;
use crate::rule::SchemaRule;

/// An ALTER TABLE statement adding one missing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddColumn {
    /// Unquoted column name.
    pub column: String,
    /// The full statement.
    pub sql: String,
}

/// Builds `ALTER TABLE <table> ADD <column> <clause>;` for a column of `rule`.
#[must_use]
pub fn add_column<D: MigrationDialect + ?Sized>(
    rule: &SchemaRule,
    column: &str,
    dialect: &D,
) -> AddColumn {
    let sql = format!(
        "ALTER TABLE {} ADD {} {};",
        dialect.quote_identifier(&rule.namespace),
        dialect.quote_identifier(column),
        column_clause(column, &rule.output_constraints)
    );
    AddColumn {
        column: column.to_string(),
        sql,
    }
}

/// Returns one [`AddColumn`] per field of `rule` missing from the live table.
///
/// Only membership is compared; column order and types of existing columns
/// are left alone. A column whose existence cannot be checked is reported
/// in `report` and skipped.
pub async fn missing_columns<C: Catalog>(
    catalog: &C,
    rule: &SchemaRule,
    report: &mut SyncReport,
) -> Vec<AddColumn> {
    let mut missing = Vec::new();
    for field in &rule.output_fields {
        match catalog.has_column(&rule.namespace, field).await {
            Ok(true) => {}
            Ok(false) => missing.push(add_column(rule, field, catalog.dialect())),
            Err(err) => {
                warn!(
                    table = %rule.namespace,
                    column = %field,
                    error = %err,
                    "Failed to check column"
                );
                report.fail(err);
            }
        }
    }
    missing
}
