//! The field abstraction shared by every form field

use serde::Serialize;

/// How a field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
	TextInput,
	HiddenInput,
}

impl Widget {
	/// Value of the `type` attribute of the rendered `<input>`
	pub fn input_type(&self) -> &'static str {
		match self {
			Widget::TextInput => "text",
			Widget::HiddenInput => "hidden",
		}
	}
}

/// Error produced while cleaning a single field value
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	/// Holds the name of the field that was left empty
	#[error("This field is required.")]
	Required(String),

	#[error("{0}")]
	Validation(String),
}

pub type FieldResult<T> = Result<T, FieldError>;

/// A form field: metadata plus a `clean` step turning raw input into a value
pub trait FormField: Send + Sync + std::fmt::Debug {
	fn name(&self) -> &str;

	fn label(&self) -> Option<&str>;

	fn required(&self) -> bool;

	fn widget(&self) -> &Widget;

	/// Validate and normalize a submitted value
	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Widget::TextInput, "text")]
	#[case(Widget::HiddenInput, "hidden")]
	fn test_widget_input_type(#[case] widget: Widget, #[case] expected: &str) {
		assert_eq!(widget.input_type(), expected);
	}

	#[rstest]
	fn test_required_error_message() {
		let error = FieldError::Required("username".to_string());

		assert_eq!(error.to_string(), "This field is required.");
	}
}
