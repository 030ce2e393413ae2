//! # multiform
//!
//! Edit one user and a variable-length list of their phone numbers in a
//! single HTML form backed by SQLite.
//!
//! The project is laid out like a small Django-style site:
//!
//! - [`apps::users`] holds the models, migrations, store, forms and view
//! - [`config`] wires settings, logging, templates, shared state and URLs
//!
//! ```rust,no_run
//! use multiform::config::{state::AppState, urls::url_patterns};
//! use multiform_conf::Settings;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::load("settings/app.toml")?;
//! let state = Arc::new(AppState::from_settings(settings).await?);
//! let router = url_patterns(state);
//! # Ok(())
//! # }
//! ```

pub mod apps;
pub mod config;

pub use config::state::AppState;
pub use config::urls::url_patterns;
