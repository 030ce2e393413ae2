//! tracing subscriber setup

use multiform_conf::Settings;
use multiform_core::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive from the settings when `RUST_LOG` is not set
pub fn default_directive(settings: &Settings) -> String {
	match &settings.log_level {
		Some(level) if !level.trim().is_empty() => level.clone(),
		_ if settings.debug => "debug".to_string(),
		_ => "info".to_string(),
	}
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level`, which takes precedence over
/// the `debug` flag.
pub fn init_logging(settings: &Settings) -> Result<()> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(default_directive(settings))
			.map_err(|e| Error::Configuration(format!("invalid log_level: {}", e)))?,
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.try_init()
		.map_err(|e| Error::Configuration(e.to_string()))
}
