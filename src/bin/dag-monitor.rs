//! # DAG Monitor Server
//!
//! Serves the read-only monitoring API. Loads configuration, wires the
//! scheduler database, lineage graph and log tiers, then serves until Ctrl-C.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use dag_monitor::config::ConfigManager;
use dag_monitor::database::{DatabaseConnection, PgRunStore};
use dag_monitor::graph::Neo4jHttpClient;
use dag_monitor::logging::init_structured_logging;
use dag_monitor::logs::{AirflowLogClient, LocalLogStore, LogRetriever, RemoteLogFetcher};
use dag_monitor::web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "dag-monitor")]
#[command(about = "Read-only monitoring API for scheduler DAG runs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration directory (default: $DAG_MONITOR_CONFIG_DIR or ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment section to apply (default: $DAG_MONITOR_ENV, $APP_ENV or development)
    #[arg(short, long)]
    environment: Option<String>,

    /// Override web.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Load and validate configuration, print it with credentials masked, and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.environment {
        Some(environment) => {
            ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), environment)
        }
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("failed to load configuration")?;

    if cli.check_config {
        println!("environment: {}", manager.environment());
        println!("{}", serde_json::to_string_pretty(&manager.debug_config())?);
        return Ok(());
    }

    let config = Arc::new(manager.config().clone());
    init_structured_logging(manager.environment(), &config.logging);

    let database = DatabaseConnection::new(&config.database)
        .context("failed to configure scheduler database pool")?;
    let runs = Arc::new(PgRunStore::new(
        database.pool().clone(),
        config.monitor.operator.clone(),
    ));

    let graph = Arc::new(
        Neo4jHttpClient::new(&config.graph).context("failed to build graph client")?,
    );

    let remote: Option<Arc<dyn RemoteLogFetcher>> = if config.airflow_api.enabled {
        Some(Arc::new(
            AirflowLogClient::new(&config.airflow_api).context("failed to build log client")?,
        ))
    } else {
        None
    };
    let retriever = Arc::new(LogRetriever::new(
        remote,
        Arc::new(LocalLogStore::new(config.logs.directory.clone())),
    ));

    let state = AppState::new(config.clone(), manager.utc_offset(), runs, graph, retriever);
    let app = create_app(state, &config.web);

    let bind_address = cli.bind.unwrap_or_else(|| config.web.bind_address.clone());
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(
        bind_address = %bind_address,
        environment = manager.environment(),
        "DAG monitor listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    info!("DAG monitor stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
