//! Core types shared by every multiform crate.
//!
//! - [`exception`]: the error taxonomy used across request handling
//! - [`messages`]: Django-style one-shot messages rendered with the next page

pub mod exception;
pub mod messages;

pub use exception::{Error, Result};
pub use messages::{Level, Message, MessagesContainer};
