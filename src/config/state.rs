//! Shared state handed to every view

use multiform_conf::Settings;
use multiform_core::{Error, Result};
use multiform_db::DatabaseConnection;
use multiform_forms::CsrfValidator;
use tera::Tera;

use super::templates::templates;

/// Everything a request handler needs, passed explicitly
#[derive(Debug)]
pub struct AppState {
	pub db: DatabaseConnection,
	pub settings: Settings,
	pub templates: Tera,
	/// `None` when CSRF protection is disabled in the settings
	pub csrf: Option<CsrfValidator>,
}

impl AppState {
	/// Connect to the configured database and load the templates
	pub async fn from_settings(settings: Settings) -> Result<Self> {
		let db = DatabaseConnection::connect(&settings.database_url).await?;
		Self::new(db, settings)
	}

	pub fn new(db: DatabaseConnection, settings: Settings) -> Result<Self> {
		let csrf = if settings.csrf_enabled {
			let validator = CsrfValidator::new(&settings.secret_key)
				.map_err(|e| Error::Configuration(e.to_string()))?;
			Some(validator)
		} else {
			tracing::warn!("CSRF protection is disabled");
			None
		};

		Ok(Self {
			db,
			settings,
			templates: templates()?,
			csrf,
		})
	}
}
