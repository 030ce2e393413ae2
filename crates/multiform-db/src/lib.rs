//! Database layer for multiform.
//!
//! A thin wrapper over an sqlx SQLite pool plus a small migration runner.
//!
//! ```rust,no_run
//! use multiform_db::{DatabaseConnection, Migration, MigrationExecutor};
//!
//! # async fn example() -> multiform_core::Result<()> {
//! let connection = DatabaseConnection::connect("sqlite::memory:").await?;
//! let initial = Migration::new("0001_initial", "notes")
//!     .add_operation("CREATE TABLE notes (id INTEGER PRIMARY KEY)")
//!     .add_reverse_operation("DROP TABLE IF EXISTS notes");
//! MigrationExecutor::new(&connection).apply(&[initial]).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{Migration, MigrationExecutor};
pub use multiform_core::{Error, Result};
