//! The combined user and phones form

use multiform_forms::{
	BoundFieldContext, CharField, FieldList, Form, FormContext, FormError, FormResult, ModelForm,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::models::{Phone, UserGraph};

pub const PHONES_FIELD: &str = "phones";
pub const SUBMIT_LABEL: &str = "Submit";

/// Sub-form editing one [`Phone`]
pub struct PhoneForm<'a> {
	form: &'a Form,
}

impl<'a> PhoneForm<'a> {
	pub fn new(form: &'a Form) -> Self {
		Self { form }
	}

	/// Fields of one phone row
	pub fn build() -> Form {
		Form::new()
			.field(
				CharField::new("phone_number")
					.with_label("Phone Number")
					.required()
					.no_strip(),
			)
			.field(
				CharField::new("phone_name")
					.with_label("Phone Description")
					.no_strip(),
			)
	}

	fn initial(phone: &Phone) -> HashMap<String, Value> {
		HashMap::from([
			("phone_number".to_string(), Value::String(phone.phone_number.clone())),
			("phone_name".to_string(), Value::String(phone.phone_name.clone())),
		])
	}
}

impl ModelForm for PhoneForm<'_> {
	type Model = Phone;

	fn populate(&self, instance: &mut Phone) -> FormResult<()> {
		instance.phone_number = self.form.require_cleaned("phone_number")?;
		instance.phone_name = self.form.require_cleaned("phone_name")?;
		Ok(())
	}
}

/// Username plus a variable-length list of phones
pub struct CombinedForm {
	form: Form,
	phones: FieldList,
}

/// Template view of [`CombinedForm`]
#[derive(Debug, Clone, Serialize)]
pub struct CombinedFormContext {
	pub username: Option<BoundFieldContext>,
	pub phones: Vec<FormContext>,
	pub non_field_errors: Vec<String>,
	pub csrf_token: Option<String>,
	pub submit_label: &'static str,
}

impl CombinedForm {
	pub fn new() -> Self {
		let form = Form::new().field(
			CharField::new("username")
				.with_label("User")
				.required()
				.no_strip(),
		);
		Self {
			form,
			phones: FieldList::new(PHONES_FIELD, PhoneForm::build),
		}
	}

	/// Form pre-filled from a loaded graph, one phone row per phone
	pub fn for_graph(graph: &UserGraph) -> Self {
		let mut combined = Self::new();
		combined.form.set_initial(HashMap::from([(
			"username".to_string(),
			Value::String(graph.user.username.clone()),
		)]));
		combined
			.phones
			.process_initial(graph.phones.iter().map(PhoneForm::initial).collect());
		combined
	}

	/// Bind url-decoded submission pairs; for repeated keys the last one wins
	pub fn bind(&mut self, pairs: Vec<(String, String)>) {
		let data: HashMap<String, Value> = pairs
			.into_iter()
			.map(|(key, value)| (key, Value::String(value)))
			.collect();
		self.phones.bind(&data);
		self.form.bind(data);
	}

	/// Validate the username, the CSRF token and every phone row
	pub fn is_valid(&mut self) -> bool {
		let form_valid = self.form.is_valid();
		let phones_valid = self.phones.is_valid();
		form_valid && phones_valid
	}

	pub fn set_csrf_token(&mut self, token: String) {
		self.form.set_csrf_token(token);
	}

	pub fn enable_csrf(&mut self) {
		self.form.enable_csrf();
	}

	pub fn form(&self) -> &Form {
		&self.form
	}

	pub fn phones(&self) -> &FieldList {
		&self.phones
	}

	pub fn context(&self) -> CombinedFormContext {
		CombinedFormContext {
			username: self
				.form
				.get_bound_field("username")
				.map(|bound| bound.context()),
			phones: self.phones.context(),
			non_field_errors: self.form.non_field_errors().to_vec(),
			csrf_token: self.form.csrf_token().map(str::to_string),
			submit_label: SUBMIT_LABEL,
		}
	}
}

impl Default for CombinedForm {
	fn default() -> Self {
		Self::new()
	}
}

impl ModelForm for CombinedForm {
	type Model = UserGraph;

	/// Phone rows are matched to the graph's phones by position. Extra rows
	/// become new transient phones and surplus phones are removed.
	fn populate(&self, instance: &mut UserGraph) -> FormResult<()> {
		if !self.phones.entries().iter().all(|entry| entry.errors().is_empty()) {
			return Err(FormError::NotValidated);
		}
		instance.user.username = self.form.require_cleaned("username")?;

		let entries = self.phones.entries();
		instance.phones.truncate(entries.len());
		for (index, entry) in entries.iter().enumerate() {
			if index == instance.phones.len() {
				instance.phones.push(Phone::default());
			}
			PhoneForm::new(entry).populate(&mut instance.phones[index])?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::users::models::User;
	use rstest::{fixture, rstest};

	#[fixture]
	fn graph() -> UserGraph {
		UserGraph::new(
			User {
				id: 1,
				username: "Umberto".to_string(),
			},
			vec![
				Phone {
					id: Some(10),
					user_id: Some(1),
					phone_number: "555-0100".to_string(),
					phone_name: "home".to_string(),
				},
				Phone {
					id: Some(11),
					user_id: Some(1),
					phone_number: "555-0101".to_string(),
					phone_name: "work".to_string(),
				},
			],
		)
	}

	fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
		items
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_for_graph_renders_one_row_per_phone(graph: UserGraph) {
		// Act
		let context = CombinedForm::for_graph(&graph).context();

		// Assert
		let username = context.username.unwrap();
		assert_eq!(username.label, "User");
		assert_eq!(username.value, "Umberto");
		assert_eq!(context.phones.len(), 2);
		assert_eq!(context.phones[1].fields[0].html_name, "phones-1-phone_number");
		assert_eq!(context.phones[1].fields[0].label, "Phone Number");
		assert_eq!(context.phones[1].fields[1].label, "Phone Description");
		assert_eq!(context.phones[1].fields[1].value, "work");
		assert_eq!(context.submit_label, "Submit");
	}

	#[rstest]
	fn test_populate_updates_in_place_and_appends(mut graph: UserGraph) {
		// Arrange
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(&[
			("username", "Umberto Eco"),
			("phones-0-phone_number", "555-0200"),
			("phones-0-phone_name", ""),
			("phones-1-phone_number", "555-0101"),
			("phones-1-phone_name", "office"),
			("phones-2-phone_number", "555-0202"),
		]));
		assert!(form.is_valid());

		// Act
		form.populate(&mut graph).unwrap();

		// Assert
		assert_eq!(graph.user.username, "Umberto Eco");
		assert_eq!(graph.phones.len(), 3);
		assert_eq!(graph.phones[0].id, Some(10));
		assert_eq!(graph.phones[0].phone_number, "555-0200");
		assert_eq!(graph.phones[0].phone_name, "");
		assert_eq!(graph.phones[1].phone_name, "office");
		assert!(graph.phones[2].is_transient());
		assert_eq!(graph.phones[2].phone_number, "555-0202");
	}

	#[rstest]
	fn test_populate_drops_surplus_phones(mut graph: UserGraph) {
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(&[("username", "Umberto"), ("phones-0-phone_number", "1")]));
		assert!(form.is_valid());

		form.populate(&mut graph).unwrap();

		assert_eq!(graph.phones.len(), 1);
		assert_eq!(graph.phones[0].id, Some(10));
	}

	#[rstest]
	#[case(&[("username", ""), ("phones-0-phone_number", "1")])]
	#[case(&[("username", "Umberto"), ("phones-0-phone_number", "  ")])]
	#[case(&[("username", "Umberto"), ("phones-0-phone_number", "")])]
	fn test_missing_required_values_are_invalid(
		mut graph: UserGraph,
		#[case] submitted: &[(&str, &str)],
	) {
		let before = graph.clone();
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(submitted));

		assert!(!form.is_valid());
		assert!(matches!(form.populate(&mut graph), Err(FormError::NotValidated)));
		assert_eq!(graph, before);
	}

	#[rstest]
	fn test_long_username_is_accepted(mut graph: UserGraph) {
		let long_name = "u".repeat(41);
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(&[("username", long_name.as_str()), ("phones-0-phone_number", "1")]));

		assert!(form.is_valid());
		form.populate(&mut graph).unwrap();
		assert_eq!(graph.user.username, long_name);
	}

	#[rstest]
	fn test_absent_keys_keep_loaded_values(mut graph: UserGraph) {
		// Arrange
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(&[
			("phones-0-phone_number", "555-0200"),
			("phones-1-phone_name", "office"),
		]));

		// Act
		assert!(form.is_valid());
		form.populate(&mut graph).unwrap();

		// Assert
		assert_eq!(graph.user.username, "Umberto");
		assert_eq!(graph.phones[0].phone_number, "555-0200");
		assert_eq!(graph.phones[0].phone_name, "home");
		assert_eq!(graph.phones[1].phone_number, "555-0101");
		assert_eq!(graph.phones[1].phone_name, "office");
	}

	#[rstest]
	fn test_submitted_text_is_stored_verbatim(mut graph: UserGraph) {
		let mut form = CombinedForm::for_graph(&graph);
		form.bind(pairs(&[("username", " Umberto "), ("phones-0-phone_number", "555 ")]));

		assert!(form.is_valid());
		form.populate(&mut graph).unwrap();

		assert_eq!(graph.user.username, " Umberto ");
		assert_eq!(graph.phones[0].phone_number, "555 ");
	}

	#[rstest]
	fn test_csrf_error_is_form_level() {
		let mut form = CombinedForm::new();
		form.set_csrf_token("expected".to_string());
		form.bind(pairs(&[
			("username", "Umberto"),
			("phones-0-phone_number", "1"),
			("csrf_token", "forged"),
		]));

		assert!(!form.is_valid());
		assert_eq!(
			form.context().non_field_errors,
			vec!["CSRF token missing or incorrect.".to_string()]
		);
	}
}
