//! sqlx-backed [`Catalog`](crate::catalog::Catalog) and
//! [`Executor`](crate::catalog::Executor) implementations.

mod mysql;
mod sqlite;

pub use mysql::MySqlDatabase;
pub use sqlite::SqliteDatabase;
