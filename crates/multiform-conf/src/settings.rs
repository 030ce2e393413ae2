//! Typed application settings built from layered sources

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};

/// Prefix for environment variable overrides (`MULTIFORM_PORT=8000`)
pub const ENV_PREFIX: &str = "MULTIFORM_";

/// Errors raised while building or validating settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("invalid value for `{key}`: {message}")]
	InvalidValue { key: String, message: String },

	#[error("`{0}` must be set")]
	Missing(&'static str),

	#[error("settings could not be deserialized: {0}")]
	Deserialize(#[from] serde_json::Error),
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
	/// sqlx connection URL, e.g. `sqlite://multiform.db?mode=rwc`
	pub database_url: String,
	/// Key used to sign CSRF tokens
	pub secret_key: String,
	pub debug: bool,
	pub host: String,
	pub port: u16,
	pub csrf_enabled: bool,
	/// tracing filter directive; falls back to `debug`/`info` when unset
	pub log_level: Option<String>,
}

impl Settings {
	/// Load settings from the TOML file at `path` with environment overrides
	pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		SettingsBuilder::new()
			.add_source(TomlFileSource::new(path.as_ref()))
			.add_source(EnvSource::new(ENV_PREFIX))
			.build()
	}

	/// Socket address the server binds to
	pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
		let ip: IpAddr = self
			.host
			.parse()
			.map_err(|e: std::net::AddrParseError| SettingsError::InvalidValue {
				key: "host".to_string(),
				message: e.to_string(),
			})?;
		Ok(SocketAddr::new(ip, self.port))
	}

	/// Check the invariants the application relies on
	///
	/// # Examples
	///
	/// ```
	/// use multiform_conf::{Settings, SettingsError};
	///
	/// let mut settings = Settings::defaults();
	/// assert!(matches!(settings.validate(), Err(SettingsError::Missing("secret_key"))));
	///
	/// settings.secret_key = "s3cr3t".to_string();
	/// assert!(settings.validate().is_ok());
	/// ```
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.database_url.trim().is_empty() {
			return Err(SettingsError::Missing("database_url"));
		}
		if self.secret_key.is_empty() {
			return Err(SettingsError::Missing("secret_key"));
		}
		if self.port == 0 {
			return Err(SettingsError::InvalidValue {
				key: "port".to_string(),
				message: "must be between 1 and 65535".to_string(),
			});
		}
		self.addr()?;
		Ok(())
	}

	/// Built-in defaults, without a secret key
	pub fn defaults() -> Self {
		Self {
			database_url: "sqlite://multiform.db?mode=rwc".to_string(),
			secret_key: String::new(),
			debug: false,
			host: "127.0.0.1".to_string(),
			port: 5002,
			csrf_enabled: true,
			log_level: None,
		}
	}

	fn default_source() -> Result<DefaultSource, SettingsError> {
		let value = serde_json::to_value(Self::defaults())?;
		let mut source = DefaultSource::new();
		if let Value::Object(map) = value {
			for (key, value) in map {
				source = source.with_value(key, value);
			}
		}
		Ok(source)
	}
}

/// Merges configuration sources by priority into [`Settings`]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create an empty builder; the built-in defaults are added by `build`
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge the sources and deserialize the result
	///
	/// Later sources of equal priority win. String values coming from the
	/// environment are coerced to the type of the matching default.
	pub fn build(mut self) -> Result<Settings, SettingsError> {
		self.sources.push(Box::new(Settings::default_source()?));
		self.sources.sort_by_key(|s| s.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		let mut defaults: IndexMap<String, Value> = IndexMap::new();

		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "loaded settings source");

			if source.priority() == 0 {
				defaults.extend(values.clone());
			}
			for (key, value) in values {
				let value = match defaults.get(&key) {
					Some(default) => coerce(&key, default, value)?,
					None => value,
				};
				merged.insert(key, value);
			}
		}

		let object: Map<String, Value> = merged.into_iter().collect();
		let settings: Settings = serde_json::from_value(Value::Object(object))?;
		settings.validate()?;
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn coerce(key: &str, default: &Value, value: Value) -> Result<Value, SettingsError> {
	let Value::String(raw) = &value else {
		return Ok(value);
	};
	let invalid = |message: &str| SettingsError::InvalidValue {
		key: key.to_string(),
		message: format!("{} (got {:?})", message, raw),
	};

	match default {
		Value::Bool(_) => match raw.to_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => Ok(json!(true)),
			"false" | "0" | "no" | "off" => Ok(json!(false)),
			_ => Err(invalid("expected a boolean")),
		},
		Value::Number(_) => raw
			.parse::<i64>()
			.map(|n| json!(n))
			.map_err(|_| invalid("expected an integer")),
		_ => Ok(value),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::io::Write;

	struct StaticSource(IndexMap<String, Value>, u8);

	impl ConfigSource for StaticSource {
		fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
			Ok(self.0.clone())
		}

		fn priority(&self) -> u8 {
			self.1
		}

		fn description(&self) -> String {
			"static".to_string()
		}
	}

	fn source(pairs: &[(&str, Value)], priority: u8) -> StaticSource {
		StaticSource(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.clone()))
				.collect(),
			priority,
		)
	}

	#[rstest]
	fn test_defaults_fill_missing_keys() {
		// Arrange
		let builder = SettingsBuilder::new().add_source(source(&[("secret_key", json!("k"))], 50));

		// Act
		let settings = builder.build().unwrap();

		// Assert
		assert_eq!(settings.port, 5002);
		assert!(settings.csrf_enabled);
		assert!(!settings.debug);
		assert_eq!(settings.log_level, None);
	}

	#[rstest]
	fn test_higher_priority_wins() {
		let settings = SettingsBuilder::new()
			.add_source(source(&[("secret_key", json!("k")), ("port", json!(8000))], 50))
			.add_source(source(&[("port", json!("9000"))], 100))
			.build()
			.unwrap();

		assert_eq!(settings.port, 9000);
	}

	#[rstest]
	#[case("true", true)]
	#[case("1", true)]
	#[case("off", false)]
	#[case("False", false)]
	fn test_string_bools_are_coerced(#[case] raw: &str, #[case] expected: bool) {
		let settings = SettingsBuilder::new()
			.add_source(source(&[("secret_key", json!("k")), ("debug", json!(raw))], 100))
			.build()
			.unwrap();

		assert_eq!(settings.debug, expected);
	}

	#[rstest]
	fn test_numeric_secret_key_stays_a_string() {
		let settings = SettingsBuilder::new()
			.add_source(source(&[("secret_key", json!("12345"))], 100))
			.build()
			.unwrap();

		assert_eq!(settings.secret_key, "12345");
	}

	#[rstest]
	fn test_invalid_port_is_rejected() {
		let result = SettingsBuilder::new()
			.add_source(source(&[("secret_key", json!("k")), ("port", json!("http"))], 100))
			.build();

		assert!(matches!(result, Err(SettingsError::InvalidValue { key, .. }) if key == "port"));
	}

	#[rstest]
	fn test_missing_secret_key_fails_validation() {
		let result = SettingsBuilder::new().build();

		assert!(matches!(result, Err(SettingsError::Missing("secret_key"))));
	}

	#[rstest]
	fn test_empty_database_url_fails_validation() {
		let result = SettingsBuilder::new()
			.add_source(source(
				&[("secret_key", json!("k")), ("database_url", json!(" "))],
				50,
			))
			.build();

		assert!(matches!(result, Err(SettingsError::Missing("database_url"))));
	}

	#[rstest]
	fn test_addr_rejects_hostname() {
		let mut settings = Settings::defaults();
		settings.host = "not an ip".to_string();

		assert!(settings.addr().is_err());
	}

	#[rstest]
	#[serial(multiform_env)]
	fn test_load_applies_env_over_file() {
		// Arrange
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "secret_key = \"from-file\"\nport = 8000").unwrap();
		// SAFETY: serialized with the other env-mutating tests
		unsafe {
			std::env::set_var("MULTIFORM_PORT", "8100");
		}

		// Act
		let settings = Settings::load(file.path());
		unsafe {
			std::env::remove_var("MULTIFORM_PORT");
		}

		// Assert
		let settings = settings.unwrap();
		assert_eq!(settings.secret_key, "from-file");
		assert_eq!(settings.port, 8100);
	}
}
