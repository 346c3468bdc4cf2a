//! gymsync-backend: HTTP status store for GymSync presence.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use gymsync_backend::{router, serve, StatusApi, StatusStore};
use gymsync_common::{GymSyncError, BANNER};
use gymsync_config::ServerConfig;

#[derive(Parser)]
#[command(name = "gymsync-backend", version, about = "Activity status store for GymSync")]
struct Args {
    /// Config file path override.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    // .env must be applied before the runtime spawns worker threads.
    gymsync_config::env::load_dotenv(args.config.as_deref());

    let config = match gymsync_config::load_backend_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gymsync-backend: {e}");
            std::process::exit(2);
        }
    };

    let directive = args
        .log_level
        .map(|level| format!("gymsync={level}"))
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();

    let mut server = config.server;
    if let Some(port) = args.port {
        server.port = port;
    }
    if server.api_key.is_empty() {
        tracing::error!("no API key configured; set API_KEY or server.api_key");
        std::process::exit(2);
    }

    let result = tokio::runtime::Runtime::new()
        .map_err(GymSyncError::from)
        .and_then(|runtime| runtime.block_on(run(server)));
    if let Err(e) = result {
        tracing::error!(error = %e, "gymsync-backend failed");
        std::process::exit(1);
    }
}

async fn run(server: ServerConfig) -> gymsync_common::Result<()> {
    let api = StatusApi::new(StatusStore::new(), server.api_key.as_str());
    let app = router(api.clone(), server.body_limit_bytes);

    let addr = server.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("{BANNER} listening on {addr}");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    serve(listener, app, shutdown).await?;

    tracing::info!(
        sessions = api.active_sessions().await,
        "shutting down, dropping in-memory sessions"
    );
    Ok(())
}
