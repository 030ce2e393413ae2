use crate::{Request, Response, Result};

/// Anything that can turn a request into a response.
///
/// Errors returned here are fatal for the request; the server logs them and
/// answers with `500 Internal Server Error`.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}
