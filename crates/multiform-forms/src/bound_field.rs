use serde::Serialize;

use crate::field::{FormField, Widget};

/// BoundField represents a field bound to form data
pub struct BoundField<'a> {
	field: &'a dyn FormField,
	data: Option<&'a serde_json::Value>,
	errors: &'a [String],
	prefix: &'a str,
}

/// Everything a template needs to render one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundFieldContext {
	pub name: String,
	pub html_name: String,
	pub id: String,
	pub label: String,
	pub value: String,
	pub input_type: &'static str,
	pub required: bool,
	pub errors: Vec<String>,
}

impl<'a> BoundField<'a> {
	pub fn new(
		field: &'a dyn FormField,
		data: Option<&'a serde_json::Value>,
		errors: &'a [String],
		prefix: &'a str,
	) -> Self {
		Self {
			field,
			data,
			errors,
			prefix,
		}
	}

	pub fn name(&self) -> &str {
		self.field.name()
	}

	/// Get the HTML name attribute (with prefix)
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::{BoundField, CharField, FormField};
	///
	/// let field = CharField::new("phone_number");
	///
	/// let bound = BoundField::new(&field, None, &[], "");
	/// assert_eq!(bound.html_name(), "phone_number");
	///
	/// let bound = BoundField::new(&field, None, &[], "phones-0");
	/// assert_eq!(bound.html_name(), "phones-0-phone_number");
	/// ```
	pub fn html_name(&self) -> String {
		if self.prefix.is_empty() {
			self.field.name().to_string()
		} else {
			format!("{}-{}", self.prefix, self.field.name())
		}
	}

	/// Get the HTML id attribute
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::{BoundField, CharField};
	///
	/// let field = CharField::new("phone_name");
	/// let bound = BoundField::new(&field, None, &[], "phones-1");
	///
	/// assert_eq!(bound.id_for_label(), "id_phones-1-phone_name");
	/// ```
	pub fn id_for_label(&self) -> String {
		format!("id_{}", self.html_name())
	}

	pub fn label(&self) -> Option<&str> {
		self.field.label()
	}

	pub fn value(&self) -> Option<&serde_json::Value> {
		self.data
	}

	/// The value as it goes into the `value` attribute
	pub fn value_str(&self) -> String {
		match self.value() {
			None | Some(serde_json::Value::Null) => String::new(),
			Some(serde_json::Value::String(s)) => s.clone(),
			Some(other) => other.to_string(),
		}
	}

	pub fn errors(&self) -> &[String] {
		self.errors
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn widget(&self) -> &Widget {
		self.field.widget()
	}

	pub fn is_required(&self) -> bool {
		self.field.required()
	}

	/// Snapshot of this field for template rendering
	///
	/// The label falls back to the field name when none was set.
	pub fn context(&self) -> BoundFieldContext {
		BoundFieldContext {
			name: self.name().to_string(),
			html_name: self.html_name(),
			id: self.id_for_label(),
			label: self.label().unwrap_or_else(|| self.name()).to_string(),
			value: self.value_str(),
			input_type: self.widget().input_type(),
			required: self.is_required(),
			errors: self.errors.to_vec(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::char_field::CharField;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_bound_field_basic() {
		let field = CharField::new("username");
		let data = json!("Umberto");

		let bound = BoundField::new(&field, Some(&data), &[], "");

		assert_eq!(bound.name(), "username");
		assert_eq!(bound.html_name(), "username");
		assert_eq!(bound.id_for_label(), "id_username");
		assert_eq!(bound.value(), Some(&data));
		assert!(!bound.has_errors());
	}

	#[rstest]
	fn test_missing_value_renders_empty() {
		let field = CharField::new("phone_number");

		let bound = BoundField::new(&field, None, &[], "phones-0");

		assert_eq!(bound.value_str(), "");
	}

	#[rstest]
	fn test_context_carries_label_and_errors() {
		// Arrange
		let field = CharField::new("phone_number")
			.with_label("Phone Number")
			.required();
		let errors = vec!["This field is required.".to_string()];

		// Act
		let context = BoundField::new(&field, Some(&json!("")), &errors, "phones-0").context();

		// Assert
		assert_eq!(context.html_name, "phones-0-phone_number");
		assert_eq!(context.id, "id_phones-0-phone_number");
		assert_eq!(context.label, "Phone Number");
		assert_eq!(context.value, "");
		assert_eq!(context.input_type, "text");
		assert!(context.required);
		assert_eq!(context.errors, errors);
	}

	#[rstest]
	fn test_context_label_defaults_to_name() {
		let field = CharField::new("phone_name");

		let context = BoundField::new(&field, None, &[], "").context();

		assert_eq!(context.label, "phone_name");
	}
}
