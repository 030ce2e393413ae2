//! HTTP server for multiform handlers.
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use multiform_server::{HttpServer, ShutdownCoordinator, shutdown_signal};
//! use std::sync::Arc;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let server = HttpServer::new(Arc::new(router));
//!
//! tokio::spawn({
//!     let coordinator = coordinator.clone();
//!     async move {
//!         shutdown_signal().await;
//!         coordinator.shutdown();
//!     }
//! });
//! server.listen_with_shutdown("127.0.0.1:5002".parse()?, coordinator).await?;
//! ```

pub mod http;
pub mod shutdown;

pub use http::HttpServer;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};

/// Error type returned by the server loop
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;
