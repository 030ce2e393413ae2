use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue, SET_COOKIE};
use hyper::{HeaderMap, StatusCode};

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Create a Response with HTTP 405 and the `Allow` header set
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::method_not_allowed(&["GET", "POST"]);
	/// assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	/// assert_eq!(response.headers.get("allow").unwrap(), "GET, POST");
	/// ```
	pub fn method_not_allowed(allowed: &[&str]) -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED).with_header("allow", &allowed.join(", "))
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body, Bytes::from("Hello, World!"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set an HTML body and the matching `Content-Type`
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Response;
	///
	/// let response = Response::ok().with_html("<p>hi</p>");
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "text/html; charset=utf-8"
	/// );
	/// ```
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/html; charset=utf-8"),
		);
		self.body = Bytes::from(html.into());
		self
	}

	/// Replace a header on the response
	///
	/// Invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Append a `Set-Cookie` header
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Response;
	///
	/// let response = Response::ok()
	///     .with_cookie("a=1; Path=/")
	///     .with_cookie("b=2; Path=/");
	/// assert_eq!(response.headers.get_all("set-cookie").iter().count(), 2);
	/// ```
	pub fn with_cookie(mut self, cookie: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(cookie) {
			self.headers.append(SET_COOKIE, value);
		}
		self
	}

	/// Body decoded as UTF-8, replacing invalid sequences
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl From<crate::Error> for Response {
	fn from(error: crate::Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		Response::new(status)
			.with_header("content-type", "text/plain; charset=utf-8")
			.with_body(error.to_string())
	}
}
