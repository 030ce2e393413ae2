//! Persistence of users and their phones

use multiform_core::{Error, Result};
use multiform_db::{DatabaseConnection, MigrationExecutor};

use super::migrations::migrations;
use super::models::{Phone, SEED_USERNAME, User, UserGraph};

/// Loads and saves [`UserGraph`]s
#[derive(Debug, Clone)]
pub struct UserStore {
	db: DatabaseConnection,
}

impl UserStore {
	pub fn new(db: DatabaseConnection) -> Self {
		Self { db }
	}

	/// Drop and recreate the schema, then insert the seed user
	///
	/// Destroys all existing data.
	pub async fn reset(&self) -> Result<User> {
		let migrations = migrations();
		let executor = MigrationExecutor::new(&self.db);
		executor.unapply(&migrations).await?;
		executor.apply(&migrations).await?;

		let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
			.bind(SEED_USERNAME)
			.execute(self.db.pool())
			.await?;

		let user = User {
			id: result.last_insert_rowid(),
			username: SEED_USERNAME.to_string(),
		};
		tracing::info!(user_id = user.id, username = %user.username, "database reset");
		Ok(user)
	}

	/// The user with the lowest id
	pub async fn first_user(&self) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>("SELECT id, username FROM users ORDER BY id LIMIT 1")
			.fetch_optional(self.db.pool())
			.await?;
		Ok(user)
	}

	/// Phones of `user_id`, ordered by id
	pub async fn phones_for(&self, user_id: i64) -> Result<Vec<Phone>> {
		let phones = sqlx::query_as::<_, Phone>(
			"SELECT id, user_id, phone_number, phone_name FROM phones WHERE user_id = ? ORDER BY id",
		)
		.bind(user_id)
		.fetch_all(self.db.pool())
		.await?;
		Ok(phones)
	}

	pub async fn load_first(&self) -> Result<Option<UserGraph>> {
		let Some(user) = self.first_user().await? else {
			return Ok(None);
		};
		let phones = self.phones_for(user.id).await?;
		Ok(Some(UserGraph::new(user, phones)))
	}

	/// Persist the graph in one transaction
	///
	/// The user row is updated, persisted phones are updated, transient phones
	/// are inserted and receive their ids, and phone rows of the user that are
	/// no longer part of the graph are deleted.
	pub async fn save(&self, graph: &mut UserGraph) -> Result<()> {
		let user_id = graph.user.id;
		let mut tx = self.db.begin().await?;

		let updated = sqlx::query("UPDATE users SET username = ? WHERE id = ?")
			.bind(&graph.user.username)
			.bind(user_id)
			.execute(&mut *tx)
			.await?;
		if updated.rows_affected() == 0 {
			return Err(Error::NotFound(format!("user {} does not exist", user_id)));
		}

		let mut kept = Vec::with_capacity(graph.phones.len());
		let mut assigned = Vec::new();
		for (index, phone) in graph.phones.iter().enumerate() {
			if let Some(id) = phone.id {
				let result = sqlx::query(
					"UPDATE phones SET phone_number = ?, phone_name = ? WHERE id = ? AND user_id = ?",
				)
				.bind(&phone.phone_number)
				.bind(&phone.phone_name)
				.bind(id)
				.bind(user_id)
				.execute(&mut *tx)
				.await?;
				if result.rows_affected() == 1 {
					kept.push(id);
					continue;
				}
				tracing::warn!(phone_id = id, user_id, "phone vanished before save, inserting it again");
			}

			let result = sqlx::query(
				"INSERT INTO phones (user_id, phone_number, phone_name) VALUES (?, ?, ?)",
			)
			.bind(user_id)
			.bind(&phone.phone_number)
			.bind(&phone.phone_name)
			.execute(&mut *tx)
			.await?;
			let id = result.last_insert_rowid();
			kept.push(id);
			assigned.push((index, id));
		}

		let existing: Vec<i64> = sqlx::query_scalar("SELECT id FROM phones WHERE user_id = ?")
			.bind(user_id)
			.fetch_all(&mut *tx)
			.await?;
		let mut deleted = 0;
		for id in existing.into_iter().filter(|id| !kept.contains(id)) {
			sqlx::query("DELETE FROM phones WHERE id = ?")
				.bind(id)
				.execute(&mut *tx)
				.await?;
			deleted += 1;
		}

		tx.commit().await?;

		for (index, id) in &assigned {
			graph.phones[*index].id = Some(*id);
		}
		for phone in &mut graph.phones {
			phone.user_id = Some(user_id);
		}

		tracing::info!(
			user_id,
			phones = graph.phones.len(),
			inserted = assigned.len(),
			deleted,
			"user saved"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	async fn store() -> UserStore {
		let db = DatabaseConnection::connect("sqlite::memory:").await.unwrap();
		let store = UserStore::new(db);
		store.reset().await.unwrap();
		store
	}

	#[rstest]
	#[tokio::test]
	async fn test_reset_seeds_one_user_without_phones() {
		// Act
		let store = store().await;

		// Assert
		let graph = store.load_first().await.unwrap().unwrap();
		assert_eq!(graph.user.username, SEED_USERNAME);
		assert!(graph.phones.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_save_assigns_ids_to_transient_phones() {
		let store = store().await;
		let mut graph = store.load_first().await.unwrap().unwrap();
		graph.phones.push(Phone::transient("555-0100", "home"));
		graph.phones.push(Phone::transient("555-0101", ""));

		store.save(&mut graph).await.unwrap();

		assert!(graph.phones.iter().all(|p| p.id.is_some()));
		assert!(graph.phones.iter().all(|p| p.user_id == Some(graph.user.id)));
		let stored = store.phones_for(graph.user.id).await.unwrap();
		assert_eq!(stored, graph.phones);
	}

	#[rstest]
	#[tokio::test]
	async fn test_save_missing_user_is_not_found() {
		let store = store().await;
		let mut graph = UserGraph::new(
			User {
				id: 999,
				username: "ghost".to_string(),
			},
			vec![Phone::transient("1", "")],
		);

		let result = store.save(&mut graph).await;

		assert!(matches!(result, Err(Error::NotFound(_))));
		assert!(graph.phones[0].is_transient());
	}
}
