//! Project configuration

pub mod logging;
pub mod state;
pub mod templates;
pub mod urls;
