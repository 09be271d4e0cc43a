//! Index grouping.
//!
//! Every column may request one or more indexes through its
//! [`ColumnConstraint`]. Columns requesting the same explicit name end up in
//! one composite index; the sentinel token asks for a generated, per-column
//! name instead.

use indexmap::IndexMap;

use crate::dialect::MigrationDialect;
use crate::rule::{ColumnConstraint, SchemaRule};

/// Plain or unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// `CREATE INDEX`.
    Plain,
    /// `CREATE UNIQUE INDEX`.
    Unique,
}

impl IndexKind {
    /// Both kinds, in the order they are applied.
    pub const ALL: [Self; 2] = [Self::Plain, Self::Unique];

    /// The token that requests a generated name.
    #[must_use]
    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::Plain => "INDEX",
            Self::Unique => "UNIQUE_INDEX",
        }
    }

    /// Prefix of generated names.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Plain => "idx",
            Self::Unique => "uix",
        }
    }

    /// Returns true for unique indexes.
    #[must_use]
    pub const fn is_unique(self) -> bool {
        matches!(self, Self::Unique)
    }

    fn requested(self, constraint: &ColumnConstraint) -> &str {
        match self {
            Self::Plain => &constraint.index,
            Self::Unique => &constraint.unique_index,
        }
    }
}

/// An index to create: a name and the columns it covers, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup {
    /// Index name.
    pub name: String,
    /// Plain or unique.
    pub kind: IndexKind,
    /// Indexed columns, in the order they were encountered.
    pub columns: Vec<String>,
}

/// Groups the columns of `rule` by the index names they request.
///
/// Groups come back in first-encounter order.
#[must_use]
pub fn index_groups<D: MigrationDialect + ?Sized>(
    rule: &SchemaRule,
    kind: IndexKind,
    dialect: &D,
) -> Vec<IndexGroup> {
    if rule.output_constraints.is_empty() {
        return Vec::new();
    }

    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for field in &rule.output_fields {
        let Some(constraint) = rule.get_constraint(field) else {
            continue;
        };
        let requested = kind.requested(constraint);
        if requested.is_empty() {
            continue;
        }

        for token in requested.split(',').map(str::trim) {
            let name = if token.is_empty() || token == kind.sentinel() {
                dialect.index_name(kind, &rule.namespace, field)
            } else {
                token.to_string()
            };

            let columns = groups.entry(name).or_default();
            if !columns.contains(field) {
                columns.push(field.clone());
            }
        }
    }

    groups
        .into_iter()
        .map(|(name, columns)| IndexGroup {
            name,
            kind,
            columns,
        })
        .collect()
}
