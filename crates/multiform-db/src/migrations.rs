//! Migrations as ordered lists of SQL statements

use multiform_core::Result;

use crate::connection::DatabaseConnection;

/// A database migration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
	/// Migration name (e.g., "0001_initial")
	pub name: String,

	/// App label
	pub app_label: String,

	/// Statements run when applying, in order
	pub operations: Vec<String>,

	/// Statements run when unapplying, in order
	pub reverse_operations: Vec<String>,
}

impl Migration {
	/// Create a new migration
	///
	/// # Examples
	///
	/// ```
	/// use multiform_db::Migration;
	///
	/// let migration = Migration::new("0001_initial", "users");
	/// assert_eq!(migration.name, "0001_initial");
	/// assert!(migration.operations.is_empty());
	/// ```
	pub fn new(name: impl Into<String>, app_label: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			app_label: app_label.into(),
			operations: Vec::new(),
			reverse_operations: Vec::new(),
		}
	}

	pub fn add_operation(mut self, sql: impl Into<String>) -> Self {
		self.operations.push(sql.into());
		self
	}

	pub fn add_reverse_operation(mut self, sql: impl Into<String>) -> Self {
		self.reverse_operations.push(sql.into());
		self
	}

	pub fn id(&self) -> String {
		format!("{}.{}", self.app_label, self.name)
	}
}

/// Runs migrations against a connection, each one inside its own transaction
pub struct MigrationExecutor<'a> {
	connection: &'a DatabaseConnection,
}

impl<'a> MigrationExecutor<'a> {
	pub fn new(connection: &'a DatabaseConnection) -> Self {
		Self { connection }
	}

	/// Apply `migrations` in order
	pub async fn apply(&self, migrations: &[Migration]) -> Result<()> {
		for migration in migrations {
			self.run(&migration.id(), &migration.operations).await?;
			tracing::info!(migration = %migration.id(), "applied migration");
		}
		Ok(())
	}

	/// Unapply `migrations` in reverse order
	pub async fn unapply(&self, migrations: &[Migration]) -> Result<()> {
		for migration in migrations.iter().rev() {
			self.run(&migration.id(), &migration.reverse_operations)
				.await?;
			tracing::info!(migration = %migration.id(), "unapplied migration");
		}
		Ok(())
	}

	async fn run(&self, id: &str, statements: &[String]) -> Result<()> {
		let mut tx = self.connection.begin().await?;
		for sql in statements {
			tracing::debug!(migration = id, sql = %sql, "running statement");
			sqlx::query(sql).execute(&mut *tx).await?;
		}
		tx.commit().await?;
		Ok(())
	}
}
