//! Settings for multiform.
//!
//! Settings are merged from several [`sources::ConfigSource`]s in priority
//! order (environment variables > TOML file > defaults) and then converted
//! into the typed [`Settings`] struct.
//!
//! ```rust,no_run
//! use multiform_conf::Settings;
//!
//! let settings = Settings::load("settings/app.toml").expect("invalid settings");
//! println!("serving on {}", settings.addr().unwrap());
//! ```

pub mod settings;
pub mod sources;

pub use settings::{ENV_PREFIX, Settings, SettingsBuilder, SettingsError};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
