//! Reconciliation options.

/// Switches for how new tables are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Treat a column clause containing `primary key` (any casing) as a
    /// primary-key marker and move it into the table's `PRIMARY KEY` clause.
    ///
    /// When disabled only [`ColumnConstraint::primary_key`] marks keys and
    /// clauses are emitted verbatim.
    ///
    /// [`ColumnConstraint::primary_key`]: crate::rule::ColumnConstraint::primary_key
    pub primary_key_phrase: bool,
    /// Add an auto-increment `id` primary key to tables without an `id` column.
    pub inject_id: bool,
    /// Add a `created_at` timestamp to tables without a `created_at` column.
    pub inject_created_at: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncOptions {
    /// Creates default options: phrase detection and both injected columns on.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary_key_phrase: true,
            inject_id: true,
            inject_created_at: true,
        }
    }

    /// Disables text-based primary key detection.
    #[must_use]
    pub const fn without_primary_key_phrase(mut self) -> Self {
        self.primary_key_phrase = false;
        self
    }

    /// Disables the injected `id` column.
    #[must_use]
    pub const fn without_id(mut self) -> Self {
        self.inject_id = false;
        self
    }

    /// Disables the injected `created_at` column.
    #[must_use]
    pub const fn without_created_at(mut self) -> Self {
        self.inject_created_at = false;
        self
    }
}
