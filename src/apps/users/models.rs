//! User and Phone records

use serde::Serialize;
use sqlx::FromRow;

/// Column widths declared in the schema; not enforced on input
pub const USERNAME_MAX_LENGTH: usize = 40;
pub const PHONE_NUMBER_MAX_LENGTH: usize = 50;
pub const PHONE_NAME_MAX_LENGTH: usize = 50;

/// Username of the user inserted when the database is initialized
pub const SEED_USERNAME: &str = "Umberto";

/// Number shown in the placeholder row of a user without phones
pub const PLACEHOLDER_PHONE_NUMBER: &str = "example";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
}

/// A phone number owned by a user
///
/// `id` is `None` until the phone has been inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct Phone {
	pub id: Option<i64>,
	pub user_id: Option<i64>,
	pub phone_number: String,
	pub phone_name: String,
}

impl Phone {
	/// A phone that has not been persisted yet
	pub fn transient(phone_number: impl Into<String>, phone_name: impl Into<String>) -> Self {
		Self {
			id: None,
			user_id: None,
			phone_number: phone_number.into(),
			phone_name: phone_name.into(),
		}
	}

	/// The row displayed when a user has no phones
	///
	/// # Examples
	///
	/// ```
	/// use multiform::apps::users::models::Phone;
	///
	/// let phone = Phone::placeholder();
	/// assert!(phone.is_transient());
	/// assert_eq!(phone.phone_number, "example");
	/// ```
	pub fn placeholder() -> Self {
		Self::transient(PLACEHOLDER_PHONE_NUMBER, "")
	}

	pub fn is_transient(&self) -> bool {
		self.id.is_none()
	}
}

/// A user together with its phones, ordered by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserGraph {
	pub user: User,
	pub phones: Vec<Phone>,
}

impl UserGraph {
	pub fn new(user: User, phones: Vec<Phone>) -> Self {
		Self { user, phones }
	}

	/// Add the placeholder phone when there is nothing to display
	///
	/// Returns true if the placeholder was added.
	pub fn ensure_phone_row(&mut self) -> bool {
		if self.phones.is_empty() {
			self.phones.push(Phone::placeholder());
			return true;
		}
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn user() -> User {
		User {
			id: 1,
			username: SEED_USERNAME.to_string(),
		}
	}

	#[rstest]
	fn test_ensure_phone_row_adds_single_placeholder() {
		// Arrange
		let mut graph = UserGraph::new(user(), vec![]);

		// Act
		let first = graph.ensure_phone_row();
		let second = graph.ensure_phone_row();

		// Assert
		assert!(first);
		assert!(!second);
		assert_eq!(graph.phones, vec![Phone::placeholder()]);
	}

	#[rstest]
	fn test_ensure_phone_row_keeps_existing_phones() {
		let phone = Phone {
			id: Some(3),
			user_id: Some(1),
			phone_number: "555-0100".to_string(),
			phone_name: "home".to_string(),
		};
		let mut graph = UserGraph::new(user(), vec![phone.clone()]);

		assert!(!graph.ensure_phone_row());
		assert_eq!(graph.phones, vec![phone]);
	}
}
