use serde::Serialize;
use std::collections::HashMap;
use subtle::ConstantTimeEq;

use crate::bound_field::{BoundField, BoundFieldContext};
use crate::field::{FieldError, FormField};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Validation error: {0}")]
	Validation(String),
	#[error("Form has not been validated")]
	NotValidated,
}

pub type FormResult<T> = Result<T, FormError>;

/// Special key for form-level (non-field-specific) errors.
pub const ALL_FIELDS_KEY: &str = "_all";

/// Name of the hidden input carrying the CSRF token
pub const CSRF_FIELD_NAME: &str = "csrf_token";

const CSRF_ERROR: &str = "CSRF token missing or incorrect.";

/// A set of fields with bound data, initial data and errors
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, serde_json::Value>,
	initial: HashMap<String, serde_json::Value>,
	errors: HashMap<String, Vec<String>>,
	is_bound: bool,
	validated: bool,
	prefix: String,
	/// Expected CSRF token for form validation
	csrf_token: Option<String>,
	csrf_enabled: bool,
}

/// Template view of a whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormContext {
	pub prefix: String,
	pub fields: Vec<BoundFieldContext>,
	pub non_field_errors: Vec<String>,
	pub csrf_token: Option<String>,
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::Form;
	///
	/// let form = Form::new();
	/// assert!(!form.is_bound());
	/// assert!(form.fields().is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_prefix(String::new())
	}

	/// Create a new form whose input names are prefixed with `prefix-`
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::Form;
	///
	/// let form = Form::with_prefix("phones-0");
	/// assert_eq!(form.prefix(), "phones-0");
	/// assert_eq!(form.add_prefix_to_field_name("phone_name"), "phones-0-phone_name");
	/// ```
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			fields: vec![],
			data: HashMap::new(),
			initial: HashMap::new(),
			errors: HashMap::new(),
			is_bound: false,
			validated: false,
			prefix: prefix.into(),
			csrf_token: None,
			csrf_enabled: false,
		}
	}

	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.push(field);
	}

	/// Builder-style [`Form::add_field`]
	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.add_field(Box::new(field));
		self
	}

	/// Bind submitted data, keyed by unprefixed field name
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::{CharField, Form};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::new().field(CharField::new("username").required());
	/// form.bind(HashMap::from([("username".to_string(), json!("Umberto"))]));
	///
	/// assert!(form.is_valid());
	/// assert_eq!(form.cleaned_str("username"), Some("Umberto"));
	/// ```
	pub fn bind(&mut self, data: HashMap<String, serde_json::Value>) {
		self.data = data;
		self.is_bound = true;
		self.validated = false;
	}

	/// Validate the form and return true if all fields are valid
	///
	/// Unbound forms are never valid. Every field is cleaned so that all
	/// errors are collected; valid values replace the submitted ones. A field
	/// whose key is absent from the bound data is cleaned from its initial
	/// value instead.
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.errors.clear();
		self.validated = true;

		if !self.validate_csrf() {
			tracing::warn!(prefix = %self.prefix, "CSRF token missing or incorrect");
			self.add_error(ALL_FIELDS_KEY, CSRF_ERROR);
			return false;
		}

		let mut cleaned_values = Vec::new();
		let mut field_errors = Vec::new();
		for field in &self.fields {
			let value = self
				.data
				.get(field.name())
				.or_else(|| self.initial.get(field.name()));
			match field.clean(value) {
				Ok(cleaned) => cleaned_values.push((field.name().to_string(), cleaned)),
				Err(e) => field_errors.push((field.name().to_string(), e.to_string())),
			}
		}
		self.data.extend(cleaned_values);
		for (name, message) in field_errors {
			self.add_error(&name, message);
		}

		tracing::debug!(prefix = %self.prefix, errors = self.errors.len(), "form validated");
		self.errors.is_empty()
	}

	/// Record an error against a field, or against the form with [`ALL_FIELDS_KEY`]
	pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
		self.errors
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	pub fn cleaned_data(&self) -> &HashMap<String, serde_json::Value> {
		&self.data
	}

	/// Cleaned string value of a field
	pub fn cleaned_str(&self, name: &str) -> Option<&str> {
		self.data.get(name).and_then(|v| v.as_str())
	}

	/// Cleaned string value of a field, failing unless the form validated
	pub fn require_cleaned(&self, name: &str) -> FormResult<String> {
		if !self.validated || !self.errors.is_empty() {
			return Err(FormError::NotValidated);
		}
		self.cleaned_str(name)
			.map(str::to_string)
			.ok_or_else(|| FormError::Validation(format!("no cleaned value for `{}`", name)))
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	pub fn non_field_errors(&self) -> &[String] {
		self.errors
			.get(ALL_FIELDS_KEY)
			.map(|e| e.as_slice())
			.unwrap_or(&[])
	}

	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}

	pub fn initial(&self) -> &HashMap<String, serde_json::Value> {
		&self.initial
	}

	pub fn set_initial(&mut self, initial: HashMap<String, serde_json::Value>) {
		self.initial = initial;
	}

	pub fn get_field(&self, name: &str) -> Option<&dyn FormField> {
		self.fields
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.as_ref())
	}

	/// Require a matching CSRF token on submission
	///
	/// When enabled, `is_valid()` checks that the submitted data contains
	/// [`CSRF_FIELD_NAME`] equal to `token`. The token is also what the form
	/// renders into its hidden input.
	///
	/// # Examples
	///
	/// ```
	/// use multiform_forms::Form;
	///
	/// let mut form = Form::new();
	/// form.set_csrf_token("abc123".to_string());
	/// assert!(form.csrf_enabled());
	/// assert_eq!(form.csrf_token(), Some("abc123"));
	/// ```
	pub fn set_csrf_token(&mut self, token: String) {
		self.csrf_token = Some(token);
		self.csrf_enabled = true;
	}

	/// Require a CSRF token without knowing a valid one; validation then
	/// always fails with a form-level error
	pub fn enable_csrf(&mut self) {
		self.csrf_token = None;
		self.csrf_enabled = true;
	}

	pub fn csrf_enabled(&self) -> bool {
		self.csrf_enabled
	}

	pub fn csrf_token(&self) -> Option<&str> {
		self.csrf_token.as_deref()
	}

	fn validate_csrf(&self) -> bool {
		if !self.csrf_enabled {
			return true;
		}

		let Some(expected) = &self.csrf_token else {
			return false;
		};

		match self.data.get(CSRF_FIELD_NAME).and_then(|v| v.as_str()) {
			Some(submitted) => submitted.as_bytes().ct_eq(expected.as_bytes()).into(),
			None => false,
		}
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn set_prefix(&mut self, prefix: impl Into<String>) {
		self.prefix = prefix.into();
	}

	pub fn add_prefix_to_field_name(&self, field_name: &str) -> String {
		if self.prefix.is_empty() {
			field_name.to_string()
		} else {
			format!("{}-{}", self.prefix, field_name)
		}
	}

	/// Bound view of one field; bound data wins over initial data
	pub fn get_bound_field<'a>(&'a self, name: &str) -> Option<BoundField<'a>> {
		let field = self.get_field(name)?;
		let submitted = if self.is_bound {
			self.data.get(name)
		} else {
			None
		};
		let data = submitted.or_else(|| self.initial.get(name));
		let errors = self.errors.get(name).map(|e| e.as_slice()).unwrap_or(&[]);

		Some(BoundField::new(field, data, errors, &self.prefix))
	}

	pub fn context(&self) -> FormContext {
		FormContext {
			prefix: self.prefix.clone(),
			fields: self
				.fields
				.iter()
				.filter_map(|f| self.get_bound_field(f.name()))
				.map(|bound| bound.context())
				.collect(),
			non_field_errors: self.non_field_errors().to_vec(),
			csrf_token: self.csrf_token.clone(),
		}
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}
