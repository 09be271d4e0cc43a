//! MySQL dialect.
//!
//! The reference dialect: new tables get a `bigint(64) unsigned`
//! auto-increment id and the `utf8mb4` charset. MySQL caps identifiers at
//! 64 characters, so long generated index names are shortened with a digest.

use sha2::{Digest, Sha256};

use super::{MigrationDialect, conventional_index_name, sanitize_key_name};
use crate::index::IndexKind;

/// Longest identifier MySQL accepts.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Characters of the column name kept in front of the digest.
const SHORT_NAME_PREFIX_LEN: usize = 24;

/// MySQL migration dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MigrationDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn index_name(&self, kind: IndexKind, table: &str, column: &str) -> String {
        let name = conventional_index_name(kind, table, column);
        if name.chars().count() <= MAX_IDENTIFIER_LEN {
            return name;
        }

        let digest = format!("{:x}", Sha256::digest(name.as_bytes()));
        let prefix: String = sanitize_key_name(column)
            .chars()
            .take(SHORT_NAME_PREFIX_LEN)
            .collect();
        let budget = MAX_IDENTIFIER_LEN - prefix.chars().count();
        format!("{prefix}{}", &digest[..budget.min(40)])
    }

    fn id_column_clause(&self) -> &'static str {
        "bigint(64) unsigned NOT NULL AUTO_INCREMENT"
    }

    fn default_table_options(&self) -> &'static str {
        " CHARSET=utf8mb4"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> MySqlDialect {
        MySqlDialect::new()
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(dialect().quote_identifier("orders"), "`orders`");
        assert_eq!(dialect().quote_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn test_create_index() {
        let sql = dialect().create_index_sql(
            "idx_orders_sku",
            "orders",
            &["sku".to_string()],
            false,
        );
        assert_eq!(sql, "CREATE INDEX `idx_orders_sku` ON `orders` (`sku`)");
    }

    #[test]
    fn test_short_index_name_is_conventional() {
        assert_eq!(
            dialect().index_name(IndexKind::Unique, "orders", "order_no"),
            "uix_orders_order_no"
        );
    }

    #[test]
    fn test_long_index_name_is_shortened() {
        let table = "t".repeat(50);
        let column = "customer_reference_number_column";
        let name = dialect().index_name(IndexKind::Plain, &table, column);

        assert_eq!(name.len(), MAX_IDENTIFIER_LEN);
        assert!(name.starts_with("customer_reference_numbe"));
        assert!(name[SHORT_NAME_PREFIX_LEN..].chars().all(|c| c.is_ascii_hexdigit()));

        // Stable across calls, distinct per table.
        assert_eq!(name, dialect().index_name(IndexKind::Plain, &table, column));
        let other = dialect().index_name(IndexKind::Plain, &"u".repeat(50), column);
        assert_ne!(name, other);
    }

    #[test]
    fn test_defaults() {
        let d = dialect();
        assert_eq!(d.default_table_options(), " CHARSET=utf8mb4");
        assert_eq!(
            d.id_column_clause(),
            "bigint(64) unsigned NOT NULL AUTO_INCREMENT"
        );
    }
}
