//! Glucowatch CLI
//!
//! Command-line interface for the glucose telemetry ingestion service.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use glucowatch::alerting::{ThresholdAlerter, WebhookNotifier};
use glucowatch::api::{AppState, HttpServer};
use glucowatch::config::LoggingConfig;
use glucowatch::ingest::Ingestor;
use glucowatch::store::{PgReadingStore, PostgresPool};
use glucowatch::Config;

/// Glucowatch - glucose telemetry ingestion and alerting
#[derive(Parser)]
#[command(name = "glucowatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "GLUCOWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ingestion server
    Serve {
        /// HTTP API port (overrides configuration)
        #[arg(long, env = "GLUCOWATCH_HTTP_PORT")]
        http_port: Option<u16>,
    },

    /// Check store connectivity and exit
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Serve { http_port } => serve(config, http_port).await,
        Commands::Health => health(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve(mut config: Config, http_port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = http_port {
        config.server.http_port = port;
    }

    info!("starting glucowatch ingestion server");

    let postgres = PostgresPool::new(&config.database).await?;
    postgres.health_check().await?;
    info!("store connection healthy");

    let store = PgReadingStore::new(&postgres);
    let notifier = WebhookNotifier::new(&config.notifier)?;
    let alerter = ThresholdAlerter::new(&config.alerting, notifier);
    let ingestor = Arc::new(Ingestor::new(store, alerter));

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    let server = HttpServer::new(AppState { ingestor, postgres });

    server.serve(&addr).await?;

    info!("glucowatch stopped");
    Ok(())
}

async fn health(config: Config) -> anyhow::Result<()> {
    let postgres = PostgresPool::new(&config.database).await?;
    postgres.health_check().await?;
    println!("store: ok");
    Ok(())
}
