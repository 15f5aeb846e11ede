//! promptlist - prompt-to-playlist service
//!
//! Serves `POST /generate` on port 3030 by default.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptlist::config::{self, Config};
use promptlist::AppState;

const DEFAULT_LOG_FILTER: &str = "promptlist=info,tower_http=info";

/// Command-line arguments for promptlist
#[derive(Parser, Debug)]
#[command(name = "promptlist")]
#[command(about = "Generate playlists from free-text prompts")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PROMPTLIST_PORT")]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, env = "PROMPTLIST_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    let args = Args::parse();

    let toml_config = config::load_toml_config(args.config.as_deref())
        .context("Failed to load configuration file")?;

    // Initialize tracing
    let default_filter = toml_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting promptlist v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(toml_config, args.port).context("Invalid configuration")?;
    info!(
        model = %config.completion.model,
        match_concurrency = config.match_concurrency,
        "Configuration resolved"
    );

    let state = AppState::from_config(&config).context("Failed to initialize service clients")?;
    let app = promptlist::build_router(state);

    let addr = SocketAddr::new(config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
