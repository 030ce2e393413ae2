//! Error taxonomy for request handling.
//!
//! Validation failures are not errors at this level: forms collect them and
//! the page is re-rendered. Everything here ends the request.

/// Errors that abort a request.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Database error: {0}")]
	Database(String),

	#[error("Template error: {0}")]
	Template(String),

	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("HTTP error: {0}")]
	Http(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// HTTP status code this error maps to.
	///
	/// # Examples
	///
	/// ```
	/// use multiform_core::Error;
	///
	/// assert_eq!(Error::Http("bad header".into()).status_code(), 400);
	/// assert_eq!(Error::Database("locked".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Http(_) => 400,
			Error::NotFound(_) => 404,
			Error::Database(_)
			| Error::Template(_)
			| Error::Configuration(_)
			| Error::Internal(_) => 500,
		}
	}
}

impl From<sqlx::Error> for Error {
	fn from(error: sqlx::Error) -> Self {
		match error {
			sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
			other => Error::Database(other.to_string()),
		}
	}
}

impl From<tera::Error> for Error {
	fn from(error: tera::Error) -> Self {
		// tera keeps the useful part of the message in the source chain
		let mut message = error.to_string();
		let mut source = std::error::Error::source(&error);
		while let Some(inner) = source {
			message.push_str(": ");
			message.push_str(&inner.to_string());
			source = inner.source();
		}
		Error::Template(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::Database("x".into()), 500)]
	#[case(Error::Template("x".into()), 500)]
	#[case(Error::Configuration("x".into()), 500)]
	#[case(Error::Internal("x".into()), 500)]
	#[case(Error::Http("x".into()), 400)]
	#[case(Error::NotFound("x".into()), 404)]
	fn test_status_code(#[case] error: Error, #[case] expected: u16) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_row_not_found_maps_to_not_found() {
		// Act
		let error: Error = sqlx::Error::RowNotFound.into();

		// Assert
		assert!(matches!(error, Error::NotFound(_)));
	}

	#[rstest]
	fn test_pool_closed_maps_to_database() {
		let error: Error = sqlx::Error::PoolClosed.into();

		assert!(matches!(error, Error::Database(_)));
		assert!(error.to_string().starts_with("Database error"));
	}
}
