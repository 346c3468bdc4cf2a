//! Polling loop that mirrors remote status into a presence display.
//!
//! Each tick fetches the configured user's status, then either publishes a
//! presence (anchoring the timer start locally) or clears it. Ticks run
//! strictly one after another inside a single task; a slow round trip
//! delays the next tick instead of overlapping it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::activity::{
    image_key_for, ActiveStatus, PresenceButton, PresenceParty, PresencePayload,
};
use crate::sink::PresenceSink;
use crate::source::StatusSource;
use crate::state::ClientPresenceState;

/// Fixed parts of the displayed presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// First line of the presence.
    pub title: String,
    pub button: Option<PresenceButton>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: "GymSync".into(),
            button: None,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A presence was published.
    Published(PresencePayload),
    /// A shown presence was cleared.
    Cleared,
    /// No session and nothing shown.
    Idle,
    /// The fetch or the publish failed; state is unchanged.
    Skipped(String),
}

pub struct PresenceReconciler {
    user_id: String,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn PresenceSink>,
    display: DisplaySettings,
    state: ClientPresenceState,
    sink_failing: bool,
}

impl PresenceReconciler {
    pub fn new(
        user_id: impl Into<String>,
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn PresenceSink>,
        display: DisplaySettings,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            source,
            sink,
            display,
            state: ClientPresenceState::new(),
            sink_failing: false,
        }
    }

    pub fn state(&self) -> &ClientPresenceState {
        &self.state
    }

    /// Run one tick against the wall clock.
    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(chrono::Utc::now().timestamp()).await
    }

    /// Run one tick with `now_epoch` as the current time in epoch seconds.
    pub async fn tick_at(&mut self, now_epoch: i64) -> TickOutcome {
        debug!(user_id = %self.user_id, "presence tick");

        let body = match self.source.fetch(&self.user_id).await {
            Ok(body) => body,
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "status fetch failed");
                return TickOutcome::Skipped(e.to_string());
            }
        };

        match body.as_ref().and_then(ActiveStatus::from_value) {
            Some(status) => self.publish(&status, now_epoch).await,
            None => self.clear().await,
        }
    }

    /// Publish `status`. Anchor changes are kept only once the sink accepts
    /// the payload, so a failed publish leaves state as it was.
    async fn publish(&mut self, status: &ActiveStatus, now_epoch: i64) -> TickOutcome {
        let mut next = self.state.clone();
        let start = next.anchor(&status.activity, status.elapsed_seconds, now_epoch);

        let payload = PresencePayload {
            state: self.display.title.clone(),
            details: status.detail(),
            start_timestamp: (!status.paused).then_some(start),
            large_image_key: image_key_for(&status.activity).to_string(),
            large_image_text: self.display.title.clone(),
            button: self.display.button.clone(),
            party: Some(PresenceParty::solo(&self.user_id)),
        };

        if let Err(e) = self.sink.set_activity(&payload).await {
            if self.sink_failing {
                debug!(sink = self.sink.name(), error = %e, "presence update failed");
            } else {
                warn!(sink = self.sink.name(), error = %e, "presence update failed");
                self.sink_failing = true;
            }
            return TickOutcome::Skipped(e.to_string());
        }

        if self.sink_failing || !self.state.is_presence_shown {
            info!(
                sink = self.sink.name(),
                details = %payload.details,
                image = %payload.large_image_key,
                "presence updated"
            );
        }
        self.sink_failing = false;
        next.is_presence_shown = true;
        self.state = next;
        TickOutcome::Published(payload)
    }

    /// Reset local state, clearing the display only if something is shown.
    ///
    /// Clearing is best effort: a sink failure is logged and otherwise
    /// ignored, since the next publish replaces whatever is displayed.
    async fn clear(&mut self) -> TickOutcome {
        if !self.state.reset() {
            return TickOutcome::Idle;
        }
        if let Err(e) = self.sink.clear_activity().await {
            debug!(sink = self.sink.name(), error = %e, "presence clear failed");
        }
        info!(sink = self.sink.name(), "presence cleared");
        TickOutcome::Cleared
    }

    /// Poll every `interval` until `shutdown` fires, then clear any shown
    /// presence.
    pub async fn run(mut self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            user_id = %self.user_id,
            sink = self.sink.name(),
            interval_ms = interval.as_millis() as u64,
            "presence loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self.clear().await;
        info!("presence loop stopped");
    }
}

#[cfg(test)]
mod tests;
