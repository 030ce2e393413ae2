//! Repeated sub-forms sharing one shape

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::form::{Form, FormContext};

type FormFactory = Arc<dyn Fn() -> Form + Send + Sync>;

/// An ordered list of sub-forms whose inputs are named `<name>-<index>-<field>`
///
/// # Examples
///
/// ```
/// use multiform_forms::{CharField, FieldList, Form};
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// let mut phones = FieldList::new("phones", || {
///     Form::new().field(CharField::new("phone_number").required())
/// });
///
/// phones.bind(&HashMap::from([
///     ("phones-0-phone_number".to_string(), json!("555-0100")),
///     ("phones-3-phone_number".to_string(), json!("555-0199")),
///     ("username".to_string(), json!("Umberto")),
/// ]));
///
/// assert_eq!(phones.len(), 2);
/// assert_eq!(phones.entries()[1].prefix(), "phones-3");
/// assert!(phones.is_valid());
/// ```
pub struct FieldList {
	name: String,
	factory: FormFactory,
	entries: Vec<Form>,
}

impl FieldList {
	pub fn new<F>(name: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> Form + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			factory: Arc::new(factory),
			entries: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Replace the entries with one unbound sub-form per initial value
	pub fn process_initial(&mut self, initial: Vec<HashMap<String, serde_json::Value>>) {
		self.entries.clear();
		for values in initial {
			self.append_entry(Some(values));
		}
	}

	/// Replace the entries with sub-forms bound from submitted data
	///
	/// One entry is created per distinct index found among keys of the form
	/// `<name>-<index>-<field>`, in ascending index order. Keys that do not
	/// belong to this list are ignored. The n-th bound entry keeps the initial
	/// values of the n-th existing entry, so keys missing from a row fall back
	/// to what that row was built from.
	pub fn bind(&mut self, data: &HashMap<String, serde_json::Value>) {
		let mut initials = self
			.entries
			.iter()
			.rev()
			.map(|form| form.initial().clone())
			.collect::<Vec<_>>();

		let mut grouped: BTreeMap<usize, HashMap<String, serde_json::Value>> = BTreeMap::new();
		for (key, value) in data {
			if let Some((index, field)) = self.parse_key(key) {
				grouped
					.entry(index)
					.or_default()
					.insert(field.to_string(), value.clone());
			}
		}

		self.entries = grouped
			.into_iter()
			.map(|(index, values)| {
				let mut form = self.new_entry(index);
				if let Some(initial) = initials.pop() {
					form.set_initial(initial);
				}
				form.bind(values);
				form
			})
			.collect();

		tracing::debug!(list = %self.name, entries = self.entries.len(), "field list bound");
	}

	fn parse_key<'k>(&self, key: &'k str) -> Option<(usize, &'k str)> {
		let rest = key.strip_prefix(self.name.as_str())?.strip_prefix('-')?;
		let (index, field) = rest.split_once('-')?;
		if field.is_empty() {
			return None;
		}
		Some((index.parse().ok()?, field))
	}

	fn new_entry(&self, index: usize) -> Form {
		let mut form = (self.factory)();
		form.set_prefix(format!("{}-{}", self.name, index));
		form
	}

	fn next_index(&self) -> usize {
		self.entries
			.iter()
			.filter_map(|form| form.prefix().rsplit('-').next()?.parse::<usize>().ok())
			.max()
			.map_or(0, |last| last + 1)
	}

	/// Append a new unbound entry after the highest existing index
	pub fn append_entry(&mut self, initial: Option<HashMap<String, serde_json::Value>>) -> &mut Form {
		let mut form = self.new_entry(self.next_index());
		if let Some(initial) = initial {
			form.set_initial(initial);
		}
		self.entries.push(form);
		let last = self.entries.len() - 1;
		&mut self.entries[last]
	}

	/// Validate every entry; valid only if all entries are
	pub fn is_valid(&mut self) -> bool {
		self.entries
			.iter_mut()
			.fold(true, |valid, form| form.is_valid() && valid)
	}

	pub fn entries(&self) -> &[Form] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Per-entry errors, in entry order
	pub fn errors(&self) -> Vec<&HashMap<String, Vec<String>>> {
		self.entries.iter().map(|form| form.errors()).collect()
	}

	pub fn context(&self) -> Vec<FormContext> {
		self.entries.iter().map(|form| form.context()).collect()
	}
}
