//! Discord Rich Presence sink using discord-sdk.
//!
//! The IPC connection lives in a background task fed over a channel, so
//! publishing never blocks the poll loop on Discord. If Discord is not
//! running the task exits and later updates report the sink unavailable.

use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use discord_sdk::{
    activity::{ActivityBuilder, Assets, Button, PartyPrivacy},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::activity::PresencePayload;
use crate::sink::{PresenceSink, SinkError};

/// Timeout for waiting for the Discord handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `close` waits for the final clear to reach Discord.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Set(PresencePayload),
    Clear,
}

/// Presence sink backed by the local Discord client.
pub struct DiscordSink {
    update_tx: Mutex<Option<mpsc::UnboundedSender<Command>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DiscordSink {
    /// Spawn the connection task for Discord application `client_id`.
    pub fn connect(client_id: i64) -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_discord_task(client_id, update_rx));
        Self {
            update_tx: Mutex::new(Some(update_tx)),
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop accepting updates and wait briefly for queued ones to flush.
    pub async fn close(&self) {
        drop(self.update_tx.lock().ok().and_then(|mut tx| tx.take()));
        let task = self.task.lock().ok().and_then(|mut task| task.take());
        if let Some(task) = task {
            if tokio::time::timeout(CLOSE_TIMEOUT, task).await.is_err() {
                tracing::debug!("Discord task did not finish before close timeout");
            }
        }
    }

    fn send(&self, command: Command) -> Result<(), SinkError> {
        let guard = self
            .update_tx
            .lock()
            .map_err(|_| SinkError::Unavailable("Discord sink poisoned".into()))?;
        let tx = guard
            .as_ref()
            .ok_or_else(|| SinkError::Unavailable("Discord sink closed".into()))?;
        tx.send(command)
            .map_err(|_| SinkError::Unavailable("Discord is not connected".into()))
    }
}

#[async_trait]
impl PresenceSink for DiscordSink {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn set_activity(&self, payload: &PresencePayload) -> Result<(), SinkError> {
        self.send(Command::Set(payload.clone()))
    }

    async fn clear_activity(&self) -> Result<(), SinkError> {
        self.send(Command::Clear)
    }
}

async fn run_discord_task(client_id: i64, mut update_rx: mpsc::UnboundedReceiver<Command>) {
    let (wheel, handler) = Wheel::new(Box::new(|err| {
        tracing::warn!("Discord error: {:?}", err);
    }));

    let mut user_spoke = wheel.user();

    let discord = match Discord::new(client_id, Subscriptions::ACTIVITY, Box::new(handler)) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Discord not available: {:?}", e);
            return;
        }
    };

    tracing::info!("Discord connecting...");

    let user = match tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
        if user_spoke.0.changed().await.is_err() {
            Err("Discord connection closed".to_string())
        } else {
            match &*user_spoke.0.borrow() {
                UserState::Connected(user) => Ok(user.clone()),
                UserState::Disconnected(err) => Err(format!("Discord disconnected: {:?}", err)),
            }
        }
    })
    .await
    {
        Ok(Ok(user)) => user,
        Ok(Err(e)) => {
            tracing::warn!("{}", e);
            return;
        }
        Err(_) => {
            tracing::warn!("Discord handshake timed out");
            return;
        }
    };

    tracing::info!(username = %user.username, "Discord Rich Presence connected");

    let mut shown: Option<Command> = None;
    while let Some(mut command) = update_rx.recv().await {
        // Only the newest queued command matters.
        while let Ok(next) = update_rx.try_recv() {
            command = next;
        }
        if shown.as_ref() == Some(&command) {
            continue;
        }

        let result = match &command {
            Command::Set(payload) => discord.update_activity(activity_for(payload)).await,
            Command::Clear => discord.clear_activity().await,
        };

        match result {
            Ok(_) => shown = Some(command),
            Err(e) => tracing::debug!("Failed to update Discord activity: {:?}", e),
        }
    }

    if matches!(shown, Some(Command::Set(_))) {
        if let Err(e) = discord.clear_activity().await {
            tracing::debug!("Failed to clear Discord activity: {:?}", e);
        }
    }
    discord.disconnect().await;
    tracing::info!("Discord Rich Presence disconnected");
}

fn activity_for(payload: &PresencePayload) -> ActivityBuilder {
    let mut activity = ActivityBuilder::new()
        .state(payload.state.clone())
        .details(payload.details.clone())
        .assets(Assets::default().large(
            payload.large_image_key.clone(),
            Some(payload.large_image_text.clone()),
        ));

    if let Some(start) = payload.start_timestamp {
        activity = activity.start_timestamp(epoch_to_system_time(start));
    }
    if let Some(party) = &payload.party {
        activity = activity.party(
            party.id.clone(),
            NonZeroU32::new(party.size),
            NonZeroU32::new(party.max),
            PartyPrivacy::Private,
        );
    }
    if let Some(button) = &payload.button {
        activity = activity.button(Button {
            label: button.label.clone(),
            url: button.url.clone(),
        });
    }
    activity
}

fn epoch_to_system_time(epoch_seconds: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(epoch_seconds.max(0) as u64)
}
