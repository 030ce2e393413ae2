//! SQLite connection pool

use multiform_core::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;

/// Shared handle to the application database
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
	pool: SqlitePool,
}

impl DatabaseConnection {
	/// Open a pool for `url`, creating the database file when missing
	///
	/// Foreign keys are enforced on every connection. An in-memory database
	/// lives inside a single connection, so its pool holds exactly one that is
	/// never recycled.
	///
	/// # Examples
	///
	/// ```
	/// use multiform_db::DatabaseConnection;
	///
	/// # async fn example() {
	/// let connection = DatabaseConnection::connect("sqlite::memory:").await.unwrap();
	/// assert_eq!(connection.pool().options().get_max_connections(), 1);
	/// # }
	/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
	/// ```
	pub async fn connect(url: &str) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(url)?
			.create_if_missing(true)
			.foreign_keys(true);

		let memory = is_memory_url(url);
		let mut pool_options = SqlitePoolOptions::new()
			.min_connections(0)
			.max_connections(if memory { 1 } else { 5 });
		if memory {
			// Closing the only connection would discard the database
			pool_options = pool_options.idle_timeout(None).max_lifetime(None);
		}
		let pool = pool_options.connect_with(options).await?;
		let max_connections = pool.options().get_max_connections();

		tracing::debug!(url, max_connections, "database pool opened");

		Ok(Self { pool })
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
		Ok(self.pool.begin().await?)
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}

fn is_memory_url(url: &str) -> bool {
	url.contains(":memory:") || url.contains("mode=memory")
}
