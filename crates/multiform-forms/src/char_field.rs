//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, Widget};

/// Free-text field
///
/// A value that is empty after trimming counts as missing. Whether the
/// surrounding whitespace is kept in the cleaned value is controlled by
/// [`CharField::no_strip`].
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub widget: Widget,
	pub strip: bool,
}

impl CharField {
	/// Create a new, optional CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::CharField;
	///
	/// let field = CharField::new("username");
	/// assert_eq!(field.name, "username");
	/// assert!(!field.required);
	/// assert!(field.strip);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			widget: Widget::TextInput,
			strip: true,
		}
	}

	/// Set the field as required
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::CharField;
	///
	/// let field = CharField::new("phone_number").required();
	/// assert!(field.required);
	/// ```
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Keep surrounding whitespace in the cleaned value
	///
	/// Presence is still judged on the trimmed text, so a whitespace-only
	/// value does not satisfy `required`.
	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value> {
		let raw = match value {
			None | Some(serde_json::Value::Null) => "",
			Some(serde_json::Value::String(s)) => s.as_str(),
			Some(_) => {
				return Err(FieldError::Validation(
					"Value must be a string".to_string(),
				));
			}
		};

		let trimmed = raw.trim();
		if trimmed.is_empty() && self.required {
			return Err(FieldError::Required(self.name.clone()));
		}

		let cleaned = if self.strip { trimmed } else { raw };
		Ok(serde_json::Value::String(cleaned.to_string()))
	}
}
