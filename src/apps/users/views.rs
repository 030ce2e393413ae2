//! The single page editing the first user and its phones

use async_trait::async_trait;
use hyper::Method;
use multiform_core::{Error, Message, MessagesContainer, Result};
use multiform_forms::{CSRF_COOKIE_NAME, CsrfValidator, ModelForm};
use multiform_http::{Handler, Request, Response};
use std::sync::Arc;
use tera::Context;

use super::forms::CombinedForm;
use super::store::UserStore;
use crate::config::state::AppState;
use crate::config::templates::render;

pub const TEMPLATE_NAME: &str = "users/multi.html";
pub const EMPTY_PHONE_MESSAGE: &str = "empty Phone provided";
pub const SAVED_MESSAGE: &str = "Saved Changes";

/// GET renders the form; POST validates it and saves on success
pub struct IndexView {
	state: Arc<AppState>,
}

/// Token to render into the page, and whether it still has to be sent as a cookie
struct CsrfRender {
	token: String,
	set_cookie: bool,
}

impl IndexView {
	pub fn new(state: Arc<AppState>) -> Self {
		Self { state }
	}

	async fn index(&self, request: Request) -> Result<Response> {
		let messages = MessagesContainer::new();
		let store = UserStore::new(self.state.db.clone());

		let mut graph = store.load_first().await?.ok_or_else(|| {
			Error::NotFound("no user in the database, run `manage initdb` first".to_string())
		})?;
		if graph.ensure_phone_row() {
			messages.add(Message::info(EMPTY_PHONE_MESSAGE));
		}

		let cookie_token = self.verified_cookie_token(&request);
		let mut form = CombinedForm::for_graph(&graph);

		if request.method == Method::POST {
			let pairs = if request.is_form_urlencoded() {
				match request.form_pairs() {
					Ok(pairs) => pairs,
					Err(err) => return Ok(Response::from(err)),
				}
			} else {
				Vec::new()
			};
			if pairs.is_empty() {
				tracing::debug!("empty submission, form left unbound");
			} else {
				form.bind(pairs);
			}
			if self.state.csrf.is_some() {
				match &cookie_token {
					Some(token) => form.set_csrf_token(token.clone()),
					None => form.enable_csrf(),
				}
			}

			if form.is_valid() {
				form.populate(&mut graph)
					.map_err(|e| Error::Internal(e.to_string()))?;
				store.save(&mut graph).await?;
				messages.add(Message::success(SAVED_MESSAGE));
				form = CombinedForm::for_graph(&graph);
			} else {
				tracing::debug!(errors = ?form.form().errors(), "submission rejected");
			}
		}

		let csrf = self.csrf_for_render(cookie_token);
		if let Some(csrf) = &csrf {
			form.set_csrf_token(csrf.token.clone());
		}

		let mut context = Context::new();
		context.insert("form", &form.context());
		context.insert("messages", &messages.take());
		let response = render(&self.state.templates, TEMPLATE_NAME, &context)?;

		Ok(match csrf {
			Some(csrf) if csrf.set_cookie => {
				response.with_cookie(&CsrfValidator::cookie_header(&csrf.token))
			}
			_ => response,
		})
	}

	fn verified_cookie_token(&self, request: &Request) -> Option<String> {
		let validator = self.state.csrf.as_ref()?;
		let token = request.cookie(CSRF_COOKIE_NAME)?;
		match validator.verify(&token) {
			Ok(()) => Some(token),
			Err(err) => {
				tracing::warn!(error = %err, "discarding CSRF cookie");
				None
			}
		}
	}

	fn csrf_for_render(&self, cookie_token: Option<String>) -> Option<CsrfRender> {
		let validator = self.state.csrf.as_ref()?;
		Some(match cookie_token {
			Some(token) => CsrfRender {
				token,
				set_cookie: false,
			},
			None => CsrfRender {
				token: validator.generate(),
				set_cookie: true,
			},
		})
	}
}

#[async_trait]
impl Handler for IndexView {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::POST => self.index(request).await,
			_ => Ok(Response::method_not_allowed(&["GET", "POST"])),
		}
	}
}
