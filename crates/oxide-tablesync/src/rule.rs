//! Rule types.
//!
//! A [`SchemaRule`] describes the table a pipeline wants to write into: its
//! name, its ordered columns, per-column overrides and table options. Rules
//! are plain input; nothing in this crate mutates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Per-column overrides.
///
/// Every field is optional. An empty `sql` falls back to the default column
/// clause, an empty `index`/`unique_index` means no index of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConstraint {
    /// Full SQL column clause, e.g. `INT NOT NULL`.
    #[serde(alias = "Sql")]
    pub sql: String,
    /// Comma-separated index names, or `INDEX` for a generated name.
    #[serde(alias = "Index")]
    pub index: String,
    /// Comma-separated unique index names, or `UNIQUE_INDEX` for a generated name.
    #[serde(alias = "UniqueIndex")]
    pub unique_index: String,
    /// Whether the column belongs to the table's primary key.
    #[serde(alias = "PrimaryKey")]
    pub primary_key: bool,
}

impl ColumnConstraint {
    /// Creates a constraint with the given column clause.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }

    /// Creates a `VARCHAR(size) NOT NULL DEFAULT '...'` column clause.
    ///
    /// Without a default value the column defaults to the empty string.
    #[must_use]
    pub fn varchar(size: usize, default: Option<&str>) -> Self {
        let default = default.unwrap_or_default().replace('\'', "''");
        Self::new(format!("VARCHAR({size}) NOT NULL DEFAULT '{default}'"))
    }

    /// Sets the requested plain index names.
    #[must_use]
    pub fn index(mut self, names: impl Into<String>) -> Self {
        self.index = names.into();
        self
    }

    /// Sets the requested unique index names.
    #[must_use]
    pub fn unique_index(mut self, names: impl Into<String>) -> Self {
        self.unique_index = names.into();
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// The desired shape of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRule {
    /// Target table name.
    #[serde(alias = "Namespace")]
    pub namespace: String,
    /// Column names, in DDL order for new tables.
    #[serde(alias = "OutputFields")]
    pub output_fields: Vec<String>,
    /// Per-column overrides keyed by column name.
    #[serde(
        default,
        alias = "OutputConstraints",
        alias = "OutputConstaints"
    )]
    pub output_constraints: HashMap<String, ColumnConstraint>,
    /// Raw table options appended to CREATE TABLE; empty uses the dialect default.
    #[serde(default, alias = "OutputTableOpts")]
    pub output_table_opts: String,
}

/// A rule file holds either a single rule or a list of rules.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleFile {
    Many(Vec<SchemaRule>),
    One(SchemaRule),
}

impl SchemaRule {
    /// Creates a rule for the given table with no columns.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.output_fields.push(name.into());
        self
    }

    /// Appends several columns.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the overrides for a column.
    #[must_use]
    pub fn constraint(mut self, column: impl Into<String>, constraint: ColumnConstraint) -> Self {
        self.output_constraints.insert(column.into(), constraint);
        self
    }

    /// Sets the raw table options.
    #[must_use]
    pub fn table_options(mut self, options: impl Into<String>) -> Self {
        self.output_table_opts = options.into();
        self
    }

    /// Gets the overrides for a column.
    #[must_use]
    pub fn get_constraint(&self, column: &str) -> Option<&ColumnConstraint> {
        self.output_constraints.get(column)
    }

    /// Checks that the rule names a table and lists each column once.
    ///
    /// A rule without columns is valid: a new table then holds only the
    /// injected columns.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(SyncError::InvalidRule("table name is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.output_fields {
            if field.trim().is_empty() {
                return Err(SyncError::InvalidRule(format!(
                    "table '{}' declares an empty column name",
                    self.namespace
                )));
            }
            if !seen.insert(field.to_lowercase()) {
                return Err(SyncError::InvalidRule(format!(
                    "table '{}' declares column '{}' twice",
                    self.namespace, field
                )));
            }
        }
        Ok(())
    }

    /// Parses one rule or a list of rules from JSON.
    pub fn from_json(json: &str) -> Result<Vec<Self>> {
        let file: RuleFile = serde_json::from_str(json)?;
        Ok(match file {
            RuleFile::Many(rules) => rules,
            RuleFile::One(rule) => vec![rule],
        })
    }

    /// Loads rules from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents).map_err(|err| match err {
            SyncError::Serialization(source) => SyncError::RuleFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}
