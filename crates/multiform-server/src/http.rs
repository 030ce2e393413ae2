use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use multiform_http::{Handler, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::ServerError;
use crate::shutdown::ShutdownCoordinator;

/// HTTP/1.1 server driving a single root handler
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	debug: bool,
}

impl HttpServer {
	/// Create a new server with the given handler
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use multiform_server::HttpServer;
	/// use multiform_http::{Handler, Request, Response, Result};
	///
	/// struct MyHandler;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for MyHandler {
	///     async fn handle(&self, _req: Request) -> Result<Response> {
	///         Ok(Response::ok().with_body("Hello"))
	///     }
	/// }
	///
	/// let server = HttpServer::new(Arc::new(MyHandler));
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			debug: false,
		}
	}

	/// Include handler error details in 500 responses
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		self.handler.clone()
	}

	/// Bind `addr` and serve until the coordinator signals shutdown
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		let listener = TcpListener::bind(addr).await?;
		self.serve(listener, coordinator).await
	}

	/// Serve connections accepted from an already bound listener
	///
	/// Returns once the coordinator signals shutdown. Open connections are
	/// interrupted by the same signal.
	pub async fn serve(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		tracing::info!(addr = %listener.local_addr()?, "server listening");

		let mut shutdown_rx = coordinator.subscribe();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result?;
					let handler = self.handler.clone();
					let debug = self.debug;
					let mut conn_shutdown = coordinator.subscribe();

					tokio::task::spawn(async move {
						tokio::select! {
							result = Self::handle_connection(stream, socket_addr, handler, debug) => {
								if let Err(err) = result {
									tracing::warn!(peer = %socket_addr, error = %err, "error handling connection");
								}
							}
							_ = conn_shutdown.recv() => {}
						}
					});
				}
				_ = shutdown_rx.recv() => {
					tracing::info!("stopping server");
					break;
				}
			}
		}

		Ok(())
	}

	/// Serve HTTP/1.1 requests on a single TCP connection
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		debug: bool,
	) -> Result<(), ServerError> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
			debug,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

/// Service implementation for hyper
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
	debug: bool,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = ServerError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;
		let debug = self.debug;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let method = request.method.clone();
			let path = request.path().to_string();

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => {
					tracing::error!(%method, %path, error = %err, "request failed");
					error_response(&err, debug)
				}
			};
			tracing::info!(%method, %path, status = response.status.as_u16(), "request");

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

fn error_response(err: &multiform_http::Error, debug: bool) -> Response {
	let body = if debug {
		format!("Internal Server Error\n\n{}", err)
	} else {
		"Internal Server Error".to_string()
	};
	Response::internal_server_error()
		.with_header("content-type", "text/plain; charset=utf-8")
		.with_body(body)
}
