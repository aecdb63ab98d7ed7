//! Employee CRUD service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hrms_api::api::{create_router, AppState};
use hrms_api::config::Config;
use hrms_api::employee;
use hrms_api::metrics;
use hrms_api::utils::shutdown_signal;
use hrms_api::AppError;

/// Employee CRUD service over MongoDB.
#[derive(Parser, Debug)]
#[command(name = "hrms-api")]
#[command(about = "HTTP CRUD service for employee records")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Connect to the store and report the employee count.
    CheckStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("hrms_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::CheckStore) => cmd_check_store().await,
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, logging any failure.
fn load_config(port_override: Option<u16>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        AppError::from(e)
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("HRMS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Store Backend: {}", config.store_backend);
    println!("  Database: {}", config.mongodb_database);
    println!("  Collection: {}", config.employees_collection);
    println!("  Connect Timeout: {}s", config.connect_timeout_seconds);
    println!("  Port: {}", config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Connect to the store and report the employee count.
async fn cmd_check_store() -> anyhow::Result<()> {
    let config = load_config(None)?;

    info!(backend = %config.store_backend, "Connecting to store...");
    let store = employee::connect(&config).await.map_err(AppError::from)?;
    store.ping().await.map_err(AppError::from)?;

    let count = store.count().await.map_err(AppError::from)?;
    println!(
        "Store OK: {} employee(s) in {}.{}",
        count, config.mongodb_database, config.employees_collection
    );

    Ok(())
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let config = load_config(port_override)?;
    info!("Configuration loaded successfully");
    info!("Store backend: {}", config.store_backend);

    // Connect to the store; failure here is fatal
    let store = employee::connect(&config).await.map_err(|e| {
        error!("Failed to connect to store: {}", e);
        AppError::from(e)
    })?;

    // Create app state
    let mut app_state = AppState::new(store);
    if config.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled: {}", e),
        }
    }

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await.map_err(AppError::from)?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("Server stopped");
    Ok(())
}
