//! Table reconciliation.
//!
//! [`Synchronizer::migrate`] brings one live table in line with a
//! [`SchemaRule`]:
//!
//! 1. If the table is missing it is created with every declared column, plus
//!    the injected `id`/`created_at` columns (see [`crate::table`]).
//! 2. Otherwise each declared column missing from the table is added with its
//!    own `ALTER TABLE` (see [`crate::columns`]).
//! 3. In both cases, every requested index that does not exist yet is created
//!    (see [`crate::index`]).
//!
//! Every statement is independent. A failure is recorded in the returned
//! [`SyncReport`] and the remaining steps still run; nothing is rolled back.
//! Existing tables are never recreated, so running the same rule again only
//! closes column and index gaps.

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Executor};
use crate::columns::missing_columns;
use crate::error::SyncError;
use crate::index::{IndexGroup, IndexKind, index_groups};
use crate::options::SyncOptions;
use crate::report::{Applied, SyncReport};
use crate::rule::SchemaRule;
use crate::table::create_table;

/// Reconciles live tables against rules.
#[derive(Debug)]
pub struct Synchronizer<'a, C, E> {
    catalog: &'a C,
    executor: &'a E,
    options: SyncOptions,
}

impl<'a, C: Catalog, E: Executor> Synchronizer<'a, C, E> {
    /// Creates a synchronizer reading from `catalog` and writing through `executor`.
    pub fn new(catalog: &'a C, executor: &'a E) -> Self {
        Self {
            catalog,
            executor,
            options: SyncOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Reconciles the table described by `rule`.
    pub async fn migrate(&self, rule: &SchemaRule) -> SyncReport {
        let mut report = SyncReport::new();

        if let Err(err) = rule.validate() {
            warn!(table = %rule.namespace, error = %err, "Skipping invalid rule");
            report.fail(err);
            return report;
        }

        match self.catalog.has_table(&rule.namespace).await {
            Ok(false) => self.create_table(rule, &mut report).await,
            Ok(true) => self.add_missing_columns(rule, &mut report).await,
            Err(err) => {
                warn!(table = %rule.namespace, error = %err, "Failed to check table");
                report.fail(err);
                return report;
            }
        }

        self.create_indexes(rule, &mut report).await;

        if report.is_noop() {
            debug!(table = %rule.namespace, "Table already up to date");
        }
        report
    }

    /// Reconciles several rules in order, merging their reports.
    pub async fn migrate_all(&self, rules: &[SchemaRule]) -> SyncReport {
        let mut report = SyncReport::new();
        for rule in rules {
            report.merge(self.migrate(rule).await);
        }
        report
    }

    async fn create_table(&self, rule: &SchemaRule, report: &mut SyncReport) {
        let table = create_table(rule, self.catalog.dialect(), &self.options);
        info!(table = %table.table, columns = table.columns.len(), "Creating table");

        if self.execute(&table.sql, report).await {
            report.record(Applied::CreateTable {
                table: table.table,
                sql: table.sql,
            });
        }
    }

    async fn add_missing_columns(&self, rule: &SchemaRule, report: &mut SyncReport) {
        for column in missing_columns(self.catalog, rule, report).await {
            info!(table = %rule.namespace, column = %column.column, "Adding column");

            if self.execute(&column.sql, report).await {
                report.record(Applied::AddColumn {
                    table: rule.namespace.clone(),
                    column: column.column,
                    sql: column.sql,
                });
            }
        }
    }

    async fn create_indexes(&self, rule: &SchemaRule, report: &mut SyncReport) {
        for kind in IndexKind::ALL {
            for group in index_groups(rule, kind, self.catalog.dialect()) {
                self.create_index(&rule.namespace, group, report).await;
            }
        }
    }

    async fn create_index(&self, table: &str, group: IndexGroup, report: &mut SyncReport) {
        match self.catalog.has_index(table, &group.name).await {
            Ok(true) => {
                debug!(table = %table, index = %group.name, "Index already exists");
                return;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(table = %table, index = %group.name, error = %err, "Failed to check index");
                report.fail(err);
                return;
            }
        }

        let unique = group.kind.is_unique();
        info!(
            table = %table,
            index = %group.name,
            columns = ?group.columns,
            unique,
            "Creating index"
        );

        match self
            .executor
            .add_index(table, &group.name, &group.columns, unique)
            .await
        {
            Ok(()) => report.record(Applied::CreateIndex {
                table: table.to_string(),
                name: group.name,
                columns: group.columns,
                unique,
            }),
            Err(err) => {
                warn!(table = %table, index = %group.name, error = %err, "Failed to create index");
                report.fail(SyncError::Index {
                    table: table.to_string(),
                    name: group.name,
                    source: Box::new(err),
                });
            }
        }
    }

    /// Runs one statement, recording a failure in `report`. Returns whether it succeeded.
    async fn execute(&self, sql: &str, report: &mut SyncReport) -> bool {
        debug!(sql = %sql, "Executing SQL");
        match self.executor.execute(sql).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Statement failed");
                report.fail(err);
                false
            }
        }
    }
}
