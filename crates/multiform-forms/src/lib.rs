//! Form processing and validation for multiform
//!
//! This crate provides:
//! - Character fields with presence checks
//! - Forms with prefixes, initial data and form-level errors
//! - Field lists of repeated sub-forms (`phones-0-phone_number`, ...)
//! - Signed double-submit CSRF tokens
//! - The [`ModelForm`] trait for writing cleaned data back onto a model

pub mod bound_field;
pub mod char_field;
pub mod csrf;
pub mod field;
pub mod field_list;
pub mod form;
pub mod model_form;

pub use bound_field::{BoundField, BoundFieldContext};
pub use char_field::CharField;
pub use csrf::{CSRF_COOKIE_NAME, CsrfError, CsrfValidator};
pub use field::{FieldError, FieldResult, FormField, Widget};
pub use field_list::FieldList;
pub use form::{ALL_FIELDS_KEY, CSRF_FIELD_NAME, Form, FormContext, FormError, FormResult};
pub use model_form::ModelForm;
