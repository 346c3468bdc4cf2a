//! gymsync-presence: mirrors a GymSync session into Discord Rich Presence.
//!
//! `watch` (the default) polls the backend and keeps the presence in sync.
//! The other commands drive the backend directly for one user.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use gymsync_common::{GymSyncError, StatusError};
use gymsync_config::{GymSyncConfig, PresenceConfig, SinkKind};
use gymsync_presence::{
    DisplaySettings, HttpStatusClient, LogSink, PresenceButton, PresenceReconciler, PresenceSink,
    SourceError, StatusSource,
};

#[derive(Parser)]
#[command(name = "gymsync-presence", version, about = "Discord presence for GymSync sessions")]
struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Discord user id to mirror (overrides config and DISCORD_ID).
    #[arg(long, global = true)]
    discord_id: Option<String>,

    /// Status endpoint base URL (overrides config and BACKEND_URL).
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the backend and mirror the session into a presence display.
    Watch {
        /// Where to publish presence.
        #[arg(long, value_enum)]
        sink: Option<SinkArg>,

        /// First line of the presence.
        #[arg(long)]
        title: Option<String>,

        /// Poll interval in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Start a session.
    Start {
        /// Activity label, e.g. "Morning Running".
        activity: String,

        /// Start the session already paused.
        #[arg(long)]
        paused: bool,
    },
    /// Pause the running session.
    Pause,
    /// Resume a paused session.
    Resume,
    /// End the session.
    Stop,
    /// Print the current session.
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum SinkArg {
    Discord,
    Log,
}

impl From<SinkArg> for SinkKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Discord => SinkKind::Discord,
            SinkArg::Log => SinkKind::Log,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // .env must be applied before the runtime spawns worker threads.
    gymsync_config::env::load_dotenv(cli.config.as_deref());

    let mut config = match gymsync_config::load_presence_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gymsync-presence: {e}");
            std::process::exit(2);
        }
    };

    let directive = cli
        .log_level
        .clone()
        .map(|level| format!("gymsync={level}"))
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();

    if let Some(id) = cli.discord_id {
        config.presence.discord_id = id;
    }
    if let Some(url) = cli.backend_url {
        config.presence.backend_url = url;
    }

    let command = cli.command.unwrap_or(Command::Watch {
        sink: None,
        title: None,
        interval_ms: None,
    });

    let result = tokio::runtime::Runtime::new()
        .map_err(GymSyncError::from)
        .and_then(|runtime| runtime.block_on(run(command, config)));
    if let Err(e) = result {
        tracing::error!(error = %e, "gymsync-presence failed");
        eprintln!("gymsync-presence: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: GymSyncConfig) -> gymsync_common::Result<()> {
    let presence = config.presence;
    if presence.discord_id.trim().is_empty() {
        return Err(GymSyncError::Other(
            "no Discord id configured; set DISCORD_ID or presence.discord_id".into(),
        ));
    }

    let client = HttpStatusClient::new(
        &presence.backend_url,
        Duration::from_secs(presence.request_timeout_secs),
    )
    .map_err(network)?
    .with_api_key(config.server.api_key);
    let user_id = presence.discord_id.clone();

    match command {
        Command::Watch {
            sink,
            title,
            interval_ms,
        } => {
            let mut presence = presence;
            if let Some(sink) = sink {
                presence.sink = sink.into();
            }
            if let Some(title) = title {
                presence.title = gymsync_config::normalize_title(&title);
            }
            if let Some(interval_ms) = interval_ms {
                presence.poll_interval_ms = interval_ms.max(100);
            }
            watch(presence, client).await
        }
        Command::Start { activity, paused } => {
            client
                .create(&user_id, &activity, paused)
                .await
                .map_err(network)?;
            println!("started \"{activity}\"");
            Ok(())
        }
        Command::Pause => {
            client.pause(&user_id).await.map_err(network)?;
            println!("paused");
            Ok(())
        }
        Command::Resume => {
            client.resume(&user_id).await.map_err(network)?;
            println!("resumed");
            Ok(())
        }
        Command::Stop => {
            client.stop(&user_id).await.map_err(network)?;
            println!("stopped");
            Ok(())
        }
        Command::Status => {
            match client.fetch(&user_id).await.map_err(network)? {
                Some(body) => println!(
                    "{}",
                    serde_json::to_string_pretty(&body).map_err(|e| GymSyncError::Other(e.to_string()))?
                ),
                None => println!("no active session"),
            }
            Ok(())
        }
    }
}

async fn watch(presence: PresenceConfig, client: HttpStatusClient) -> gymsync_common::Result<()> {
    let display = DisplaySettings {
        title: presence.title.clone(),
        button: Some(PresenceButton {
            label: presence.button_label.clone(),
            url: presence.button_url.clone(),
        }),
    };

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::info!("shutting down");
        signal.cancel();
    });

    let interval = Duration::from_millis(presence.poll_interval_ms);
    let source: Arc<dyn StatusSource> = Arc::new(client);

    match presence.sink {
        #[cfg(feature = "discord")]
        SinkKind::Discord => {
            let sink = Arc::new(gymsync_presence::DiscordSink::connect(presence.client_id));
            let reconciler =
                PresenceReconciler::new(&presence.discord_id, source, sink.clone(), display);
            reconciler.run(interval, shutdown).await;
            sink.close().await;
        }
        #[cfg(not(feature = "discord"))]
        SinkKind::Discord => {
            tracing::warn!("built without Discord support; logging presence instead");
            run_with(&presence, source, Arc::new(LogSink::new()), display, interval, shutdown).await;
        }
        SinkKind::Log => {
            run_with(&presence, source, Arc::new(LogSink::new()), display, interval, shutdown).await;
        }
    }
    Ok(())
}

async fn run_with(
    presence: &PresenceConfig,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn PresenceSink>,
    display: DisplaySettings,
    interval: Duration,
    shutdown: CancellationToken,
) {
    PresenceReconciler::new(&presence.discord_id, source, sink, display)
        .run(interval, shutdown)
        .await;
}

/// Backend rejections keep their status meaning; everything else is a
/// network failure.
fn network(err: SourceError) -> GymSyncError {
    match err {
        SourceError::Rejected { status: 401, .. } => StatusError::Unauthorized.into(),
        SourceError::Rejected { status: 400, .. } => StatusError::InvalidPayload.into(),
        SourceError::Rejected { status: 404, .. } => StatusError::NotFound.into(),
        other => GymSyncError::Network(other.to_string()),
    }
}
