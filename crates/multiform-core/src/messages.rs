//! One-shot messages shown to the user with the next rendered page.
//!
//! A [`MessagesContainer`] lives for the duration of one request. Views add
//! messages while handling the request and the template drains them when the
//! page is rendered.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Message levels (similar to Django)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Debug,
	Info,
	Success,
	Warning,
	Error,
}

impl Level {
	/// Returns the string representation of the level
	///
	/// # Examples
	///
	/// ```
	/// use multiform_core::Level;
	///
	/// assert_eq!(Level::Info.as_str(), "info");
	/// assert_eq!(Level::Success.as_str(), "success");
	/// ```
	pub fn as_str(&self) -> &'static str {
		match self {
			Level::Debug => "debug",
			Level::Info => "info",
			Level::Success => "success",
			Level::Warning => "warning",
			Level::Error => "error",
		}
	}

	/// Numeric value of the level, used for ordering
	pub fn value(&self) -> i32 {
		match self {
			Level::Debug => 10,
			Level::Info => 20,
			Level::Success => 25,
			Level::Warning => 30,
			Level::Error => 40,
		}
	}
}

impl PartialOrd for Level {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Level {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.value().cmp(&other.value())
	}
}

impl Default for Level {
	fn default() -> Self {
		Level::Info
	}
}

/// A single user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub level: Level,
	pub text: String,
}

impl Message {
	pub fn new(level: Level, text: impl Into<String>) -> Self {
		Self {
			level,
			text: text.into(),
		}
	}

	pub fn info(text: impl Into<String>) -> Self {
		Self::new(Level::Info, text)
	}

	pub fn success(text: impl Into<String>) -> Self {
		Self::new(Level::Success, text)
	}

	pub fn warning(text: impl Into<String>) -> Self {
		Self::new(Level::Warning, text)
	}

	pub fn error(text: impl Into<String>) -> Self {
		Self::new(Level::Error, text)
	}

	/// CSS-friendly tag for the level
	pub fn tag(&self) -> &'static str {
		self.level.as_str()
	}
}

/// Request-scoped message storage
///
/// Cloning a container shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MessagesContainer {
	messages: Arc<Mutex<Vec<Message>>>,
}

impl MessagesContainer {
	/// Create an empty container
	///
	/// # Examples
	///
	/// ```
	/// use multiform_core::{Message, MessagesContainer};
	///
	/// let container = MessagesContainer::new();
	/// container.add(Message::success("Saved Changes"));
	/// assert_eq!(container.peek().len(), 1);
	///
	/// let drained = container.take();
	/// assert_eq!(drained[0].text, "Saved Changes");
	/// assert!(container.peek().is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&self, message: Message) {
		self.lock().push(message);
	}

	/// Messages currently stored, without consuming them
	pub fn peek(&self) -> Vec<Message> {
		self.lock().clone()
	}

	/// Drain all messages
	pub fn take(&self) -> Vec<Message> {
		std::mem::take(&mut *self.lock())
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
		self.messages
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_level() {
		assert_eq!(Level::default(), Level::Info);
	}

	#[rstest]
	fn test_level_ordering() {
		assert!(Level::Debug < Level::Info);
		assert!(Level::Info < Level::Success);
		assert!(Level::Success < Level::Warning);
		assert!(Level::Warning < Level::Error);
	}

	#[rstest]
	fn test_messages_keep_insertion_order() {
		// Arrange
		let container = MessagesContainer::new();

		// Act
		container.add(Message::info("empty Phone provided"));
		container.add(Message::success("Saved Changes"));

		// Assert
		let texts: Vec<_> = container.take().into_iter().map(|m| m.text).collect();
		assert_eq!(texts, vec!["empty Phone provided", "Saved Changes"]);
	}

	#[rstest]
	fn test_clone_shares_storage() {
		let container = MessagesContainer::new();
		let clone = container.clone();

		clone.add(Message::warning("careful"));

		assert_eq!(container.peek().len(), 1);
		assert_eq!(container.peek()[0].tag(), "warning");
	}

	#[rstest]
	fn test_take_empties_container() {
		let container = MessagesContainer::new();
		container.add(Message::error("boom"));

		assert_eq!(container.take().len(), 1);
		assert!(container.take().is_empty());
	}
}
