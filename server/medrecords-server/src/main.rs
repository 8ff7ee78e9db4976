use clap::Parser;
use tracing::info;

use error_common::{log_error, MedRecordsError, Result};
use logger_redacted::{init_logging, LoggerConfig};
use medrecords_server::{config::DEFAULT_CONFIG_FILE, create_app, AppState, ServerConfig};

/// MedRecords HTTP server
#[derive(Parser, Debug)]
#[command(name = "medrecords-server")]
#[command(about = "Medical records API behind a session and CSRF perimeter")]
struct Args {
    /// Server bind address (overrides configuration)
    #[arg(long, env = "MEDRECORDS_HOST")]
    host: Option<String>,

    /// Server port (overrides configuration)
    #[arg(short, long, env = "MEDRECORDS_PORT")]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(&args.config)
        .map_err(|e| MedRecordsError::ConfigError(format!("{}: {e}", args.config)))?;
    apply_overrides(&mut config, &args);

    init_logging(&config.logging).map_err(|e| MedRecordsError::ConfigError(e.to_string()))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Starting MedRecords server"
    );

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            log_error("perimeter initialization", &e);
            return Err(e);
        }
    };
    let app = create_app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MedRecordsError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!(address = %addr, "MedRecords server listening");
    info!(
        "Health check available at: http://{addr}/api/public/health"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MedRecordsError::ServerError(format!("HTTP server error: {e}")))?;

    info!("MedRecords server stopped");
    Ok(())
}

fn apply_overrides(config: &mut ServerConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.verbose {
        config.logging = LoggerConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        };
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
