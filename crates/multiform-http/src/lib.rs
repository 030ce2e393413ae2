//! HTTP layer for multiform.
//!
//! Provides the request and response types handed to views, the [`Handler`]
//! trait implemented by views and routers, and an exact-path [`Router`].

pub mod handler;
pub mod request;
pub mod response;
pub mod router;

pub use handler::Handler;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use router::Router;

pub use multiform_core::{Error, Result};
