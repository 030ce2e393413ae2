//! Management commands: `manage runserver` and `manage initdb`

use anyhow::Context;
use clap::{Parser, Subcommand};
use multiform::apps::users::UserStore;
use multiform::config::logging::init_logging;
use multiform::{AppState, url_patterns};
use multiform_conf::Settings;
use multiform_server::{HttpServer, ShutdownCoordinator, shutdown_signal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "manage", version, about = "Run and administer the multiform site")]
struct Cli {
	/// Settings file
	#[arg(
		long,
		global = true,
		env = "MULTIFORM_SETTINGS",
		default_value = "settings/app.toml"
	)]
	settings: PathBuf,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Reset the database, then serve the site until Ctrl-C
	Runserver {
		/// Address to bind, overriding `host` and `port` from the settings
		#[arg(long)]
		addr: Option<SocketAddr>,

		/// Keep existing data instead of recreating the schema
		#[arg(long)]
		keep_data: bool,
	},
	/// Drop and recreate the schema and insert the seed user
	Initdb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let settings = Settings::load(&cli.settings)
		.with_context(|| format!("loading settings from {}", cli.settings.display()))?;
	init_logging(&settings)?;
	tracing::debug!(settings = %cli.settings.display(), "settings loaded");

	let addr = match &cli.command {
		Command::Runserver { addr: Some(addr), .. } => *addr,
		_ => settings.addr()?,
	};
	let debug_mode = settings.debug;
	let state = Arc::new(AppState::from_settings(settings).await?);
	let store = UserStore::new(state.db.clone());

	match cli.command {
		Command::Initdb => {
			store.reset().await?;
		}
		Command::Runserver { keep_data, .. } => {
			if keep_data {
				tracing::info!("keeping existing data");
			} else {
				store.reset().await?;
			}
			runserver(state, addr, debug_mode).await?;
		}
	}

	Ok(())
}

async fn runserver(state: Arc<AppState>, addr: SocketAddr, debug_mode: bool) -> anyhow::Result<()> {
	let router = url_patterns(state.clone());
	let server = HttpServer::new(Arc::new(router)).with_debug(debug_mode);
	let coordinator = ShutdownCoordinator::new();

	tokio::spawn({
		let coordinator = coordinator.clone();
		async move {
			shutdown_signal().await;
			coordinator.shutdown();
		}
	});

	tracing::info!(%addr, debug = debug_mode, "starting development server");
	server
		.listen_with_shutdown(addr, coordinator)
		.await
		.map_err(|e| anyhow::anyhow!(e))?;

	state.db.close().await;
	Ok(())
}
