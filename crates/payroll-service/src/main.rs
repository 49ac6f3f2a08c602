//! Main entry point for the payroll service.
//!
//! Serves the employee and order resources over HTTP. Storage backends are
//! pluggable and selected by configuration.

use clap::Parser;
use payroll_config::Config;
use payroll_core::{PayrollBuilder, PayrollEngine};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod links;
mod server;

/// Command-line arguments for the payroll service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	// RUST_LOG takes precedence over --log-level
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started payroll service");

	let config_path = args.config.to_string_lossy();
	let config = Config::from_file(&config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.payroll.id);

	let api_config = config.api.clone();
	let engine = Arc::new(build_engine(config)?);
	engine.seed().await?;

	server::start_server(api_config, engine).await?;

	tracing::info!("Stopped payroll service");
	Ok(())
}

/// Builds the engine, wiring in every known storage backend.
fn build_engine(config: Config) -> Result<PayrollEngine, Box<dyn std::error::Error>> {
	let storage_factories: HashMap<String, _> = payroll_storage::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect();

	let engine = PayrollBuilder::new(config).build(storage_factories)?;
	Ok(engine)
}
