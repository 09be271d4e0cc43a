//! CREATE TABLE synthesis for tables that do not exist yet.

use crate::dialect::MigrationDialect;
use crate::options::SyncOptions;
use crate::resolve::column_clause;
use crate::rule::SchemaRule;

const PRIMARY_KEY_PHRASE: &str = "primary key";

/// A synthesized CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// Unquoted table name.
    pub table: String,
    /// Column definitions, in emission order, including injected columns.
    pub columns: Vec<String>,
    /// Quoted primary key members.
    pub primary_key: Vec<String>,
    /// The full statement.
    pub sql: String,
}

/// Removes the first `primary key` phrase (any casing) from a column clause.
///
/// Returns `None` when the clause does not contain the phrase.
#[must_use]
pub fn strip_primary_key(clause: &str) -> Option<String> {
    let at = clause.to_ascii_lowercase().find(PRIMARY_KEY_PHRASE)?;
    let before = clause[..at].trim_end();
    let after = clause[at + PRIMARY_KEY_PHRASE.len()..].trim_start();

    Some(match (before.is_empty(), after.is_empty()) {
        (true, _) => after.to_string(),
        (_, true) => before.to_string(),
        _ => format!("{before} {after}"),
    })
}

/// Returns the options appended after the column list.
#[must_use]
pub fn table_options<D: MigrationDialect + ?Sized>(rule: &SchemaRule, dialect: &D) -> String {
    if rule.output_table_opts.is_empty() {
        dialect.default_table_options().to_string()
    } else {
        format!(" {}", rule.output_table_opts)
    }
}

/// Builds the CREATE TABLE statement for `rule`.
#[must_use]
pub fn create_table<D: MigrationDialect + ?Sized>(
    rule: &SchemaRule,
    dialect: &D,
    options: &SyncOptions,
) -> CreateTable {
    let mut columns = Vec::with_capacity(rule.output_fields.len() + 2);
    let mut primary_key = Vec::new();
    let mut found_id = false;
    let mut found_created_at = false;

    for field in &rule.output_fields {
        match field.to_lowercase().as_str() {
            "id" => found_id = true,
            "created_at" => found_created_at = true,
            _ => {}
        }

        let quoted = dialect.quote_identifier(field);
        let clause = column_clause(field, &rule.output_constraints);
        let flagged = rule.get_constraint(field).is_some_and(|c| c.primary_key);
        let stripped = if options.primary_key_phrase {
            strip_primary_key(clause)
        } else {
            None
        };

        if flagged || stripped.is_some() {
            primary_key.push(quoted.clone());
        }

        let clause = stripped.as_deref().unwrap_or(clause);
        if clause.is_empty() {
            columns.push(quoted);
        } else {
            columns.push(format!("{quoted} {clause}"));
        }
    }

    if !found_id && options.inject_id {
        let id = dialect.quote_identifier("id");
        columns.push(format!("{id} {}", dialect.id_column_clause()));
        primary_key.push(id);
    }
    if !found_created_at && options.inject_created_at {
        columns.push(format!(
            "{} {}",
            dialect.quote_identifier("created_at"),
            dialect.created_at_column_clause()
        ));
    }

    let mut definitions = columns.clone();
    if !primary_key.is_empty() {
        definitions.push(format!("PRIMARY KEY ({})", primary_key.join(",")));
    }

    let sql = format!(
        "CREATE TABLE {} ({}){}",
        dialect.quote_identifier(&rule.namespace),
        definitions.join(", "),
        table_options(rule, dialect)
    );

    CreateTable {
        table: rule.namespace.clone(),
        columns,
        primary_key,
        sql,
    }
}
