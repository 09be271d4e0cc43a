//! Column clause resolution.

use std::collections::HashMap;

use crate::rule::ColumnConstraint;

/// Clause used for columns without an explicit `sql` override.
pub const DEFAULT_COLUMN_CLAUSE: &str = "varchar(255) NOT NULL DEFAULT ''";

/// Returns the SQL clause for `column`: its override when non-empty,
/// otherwise [`DEFAULT_COLUMN_CLAUSE`].
#[must_use]
pub fn column_clause<'a>(
    column: &str,
    constraints: &'a HashMap<String, ColumnConstraint>,
) -> &'a str {
    constraints
        .get(column)
        .map(|c| c.sql.as_str())
        .filter(|sql| !sql.is_empty())
        .unwrap_or(DEFAULT_COLUMN_CLAUSE)
}
