//! Writing validated form data back onto model values

use crate::form::FormResult;

/// A form that edits an instance of `Model`
///
/// Implementations map each cleaned field onto the matching model attribute
/// by hand.
///
/// # Examples
///
/// ```
/// use multiform_forms::{CharField, Form, FormResult, ModelForm};
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// struct Note { body: String }
///
/// struct NoteForm { form: Form }
///
/// impl ModelForm for NoteForm {
///     type Model = Note;
///
///     fn populate(&self, instance: &mut Note) -> FormResult<()> {
///         instance.body = self.form.require_cleaned("body")?;
///         Ok(())
///     }
/// }
///
/// let mut form = Form::new().field(CharField::new("body").required());
/// form.bind(HashMap::from([("body".to_string(), json!(" hi "))]));
/// assert!(form.is_valid());
///
/// let mut note = Note { body: String::new() };
/// NoteForm { form }.populate(&mut note).unwrap();
/// assert_eq!(note.body, "hi");
/// ```
pub trait ModelForm {
	type Model;

	/// Copy cleaned values onto `instance`
	///
	/// Fails with [`crate::FormError::NotValidated`] when called on a form
	/// that has not successfully validated.
	fn populate(&self, instance: &mut Self::Model) -> FormResult<()>;
}
