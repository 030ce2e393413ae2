//! Exact-path routing.

use crate::{Handler, Request, Response, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatches requests to handlers registered for an exact path
///
/// Unknown paths are answered with `404 Not Found`. Method dispatch is left
/// to the handler.
#[derive(Default, Clone)]
pub struct Router {
	routes: HashMap<String, Arc<dyn Handler>>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler for `path`, replacing any previous one
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::{Handler, Request, Response, Result, Router};
	/// use std::sync::Arc;
	///
	/// struct Hello;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for Hello {
	///     async fn handle(&self, _request: Request) -> Result<Response> {
	///         Ok(Response::ok().with_body("hello"))
	///     }
	/// }
	///
	/// let router = Router::new().route("/", Arc::new(Hello));
	/// assert!(router.has_route("/"));
	/// assert!(!router.has_route("/other"));
	/// ```
	pub fn route(mut self, path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		self.routes.insert(path.into(), handler);
		self
	}

	pub fn has_route(&self, path: &str) -> bool {
		self.routes.contains_key(path)
	}
}

#[async_trait::async_trait]
impl Handler for Router {
	async fn handle(&self, request: Request) -> Result<Response> {
		match self.routes.get(request.path()) {
			Some(handler) => handler.handle(request).await,
			None => {
				tracing::debug!(path = request.path(), "no route matched");
				Ok(Response::not_found().with_body("Not Found"))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::StatusCode;
	use rstest::rstest;

	struct Echo(&'static str);

	#[async_trait::async_trait]
	impl Handler for Echo {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(self.0))
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatches_to_registered_path() {
		// Arrange
		let router = Router::new()
			.route("/", Arc::new(Echo("root")))
			.route("/about", Arc::new(Echo("about")));
		let request = Request::builder().uri("/about").build().unwrap();

		// Act
		let response = router.handle(request).await.unwrap();

		// Assert
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.text(), "about");
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_path_is_not_found() {
		let router = Router::new().route("/", Arc::new(Echo("root")));
		let request = Request::builder().uri("/missing").build().unwrap();

		let response = router.handle(request).await.unwrap();

		assert_eq!(response.status, StatusCode::NOT_FOUND);
	}

	#[rstest]
	#[tokio::test]
	async fn test_query_string_does_not_affect_match() {
		let router = Router::new().route("/", Arc::new(Echo("root")));
		let request = Request::builder().uri("/?x=1").build().unwrap();

		let response = router.handle(request).await.unwrap();

		assert_eq!(response.text(), "root");
	}
}
