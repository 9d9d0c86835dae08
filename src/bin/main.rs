use std::process::exit;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing::error;

use gcp_project_reaper::cli::Cli;
use gcp_project_reaper::config::{Config, ConfigError, Exclusions};
use gcp_project_reaper::platform::http::{build_http_client, HttpGcpClient};
use gcp_project_reaper::platform::GcpClient;
use gcp_project_reaper::registry::RegistryError;
use gcp_project_reaper::{driver, dry_run, logging, resources};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Platform(#[from] gcp_project_reaper::platform::PlatformError),

    #[error(transparent)]
    Driver(#[from] gcp_project_reaper::driver::DriverError),

    #[error("could not build HTTP client: {0}")]
    HttpClient(gcp_project_reaper::platform::PlatformError),
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!(%err, "gcp-project-reaper exited with an error");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let exclusions = match &cli.exclusions_config {
        Some(path) => Exclusions::load(path)?,
        None => Exclusions::default(),
    };

    let http = build_http_client(cli.timeout()).map_err(AppError::HttpClient)?;
    let client = Arc::new(HttpGcpClient::new(http, cli.gcp_access_token.clone()));

    let zones = if cli.zones.is_empty() {
        client.list_zones(&cli.project)?
    } else {
        cli.zones.clone()
    };
    let regions = if cli.regions.is_empty() {
        client.list_regions(&cli.project)?
    } else {
        cli.regions.clone()
    };

    let config = Config::new(
        cli.project.clone(),
        zones,
        regions,
        cli.timeout(),
        cli.poll_interval(),
        cli.dry_run,
        exclusions,
        client,
    );

    let registry = resources::register_all(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start the tokio runtime");

    if config.dry_run {
        dry_run::report(&registry)?;
        return Ok(());
    }

    let config = Arc::new(config);
    runtime.block_on(driver::run(&registry, config))?;
    Ok(())
}
