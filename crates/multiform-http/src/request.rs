use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, COOKIE};
use hyper::{HeaderMap, Method, Uri, Version};
use multiform_core::{Error, Result};
use std::net::SocketAddr;

/// HTTP request as seen by handlers
///
/// The body is fully buffered by the server before the handler runs.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
}

impl Request {
	/// Create a new request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Returns true if the body is declared as `application/x-www-form-urlencoded`
	pub fn is_form_urlencoded(&self) -> bool {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(|value| {
				value
					.split(';')
					.next()
					.unwrap_or_default()
					.trim()
					.eq_ignore_ascii_case("application/x-www-form-urlencoded")
			})
			.unwrap_or(false)
	}

	/// Decode a url-encoded form body into ordered key/value pairs
	///
	/// Repeated keys are kept in submission order.
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("username=Umberto&phones-0-phone_number=555+1234")
	///     .build()
	///     .unwrap();
	///
	/// let pairs = request.form_pairs().unwrap();
	/// assert_eq!(pairs[0], ("username".to_string(), "Umberto".to_string()));
	/// assert_eq!(pairs[1].1, "555 1234");
	/// ```
	pub fn form_pairs(&self) -> Result<Vec<(String, String)>> {
		serde_urlencoded::from_bytes(&self.body)
			.map_err(|e| Error::Http(format!("Invalid form body: {}", e)))
	}

	/// Value of a cookie sent with the request
	///
	/// # Examples
	///
	/// ```
	/// use multiform_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("cookie", "theme=dark; csrftoken=abc")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.cookie("csrftoken").as_deref(), Some("abc"));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|header| header.split(';'))
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value.to_string())
	}
}

/// Builder for [`Request`], mostly useful in tests
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: Vec<(String, String)>,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: None,
			version: Version::HTTP_11,
			headers: Vec::new(),
			body: Bytes::new(),
			remote_addr: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	/// Build the request, validating the URI and headers
	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| Error::Http(format!("Invalid URI: {}", e)))?;

		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let name = hyper::header::HeaderName::from_bytes(name.as_bytes())
				.map_err(|e| Error::Http(format!("Invalid header name: {}", e)))?;
			let value = hyper::header::HeaderValue::from_str(&value)
				.map_err(|e| Error::Http(format!("Invalid header value: {}", e)))?;
			headers.append(name, value);
		}

		let mut request = Request::new(self.method, uri, self.version, headers, self.body);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
