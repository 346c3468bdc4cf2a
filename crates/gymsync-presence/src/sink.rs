//! Presence display abstraction.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::activity::PresencePayload;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("presence display unavailable: {0}")]
    Unavailable(String),
}

/// A third-party presence display (Discord, a log, ...).
#[async_trait]
pub trait PresenceSink: Send + Sync {
    /// Name of the display, for logging.
    fn name(&self) -> &'static str;

    /// Show or replace the current presence.
    async fn set_activity(&self, payload: &PresencePayload) -> Result<(), SinkError>;

    /// Remove any shown presence.
    async fn clear_activity(&self) -> Result<(), SinkError>;
}

/// Sink that writes presence to the log.
///
/// A payload equal to the previous one logs at debug, so a steady session
/// produces one info line rather than one per poll.
#[derive(Debug, Default)]
pub struct LogSink {
    last: Mutex<Option<PresencePayload>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `payload`, returning whether it differs from the last one.
    fn remember(&self, payload: Option<&PresencePayload>) -> bool {
        let Ok(mut last) = self.last.lock() else {
            return true;
        };
        if last.as_ref() == payload {
            return false;
        }
        *last = payload.cloned();
        true
    }
}

#[async_trait]
impl PresenceSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn set_activity(&self, payload: &PresencePayload) -> Result<(), SinkError> {
        if self.remember(Some(payload)) {
            tracing::info!(
                state = %payload.state,
                details = %payload.details,
                start = ?payload.start_timestamp,
                image = %payload.large_image_key,
                "presence"
            );
        } else {
            tracing::debug!(details = %payload.details, "presence unchanged");
        }
        Ok(())
    }

    async fn clear_activity(&self) -> Result<(), SinkError> {
        if self.remember(None) {
            tracing::info!("presence cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(details: &str) -> PresencePayload {
        PresencePayload {
            state: "GymSync".into(),
            details: details.into(),
            start_timestamp: Some(100),
            large_image_key: "running".into(),
            large_image_text: "GymSync".into(),
            button: None,
            party: None,
        }
    }

    #[test]
    fn repeated_payload_is_not_a_change() {
        let sink = LogSink::new();
        let running = payload("running");

        assert!(sink.remember(Some(&running)));
        assert!(!sink.remember(Some(&running)));
        assert!(sink.remember(Some(&payload("[⏸️ Paused] running"))));
    }

    #[test]
    fn clear_is_a_change_only_after_a_payload() {
        let sink = LogSink::new();
        assert!(!sink.remember(None));

        sink.remember(Some(&payload("gym")));
        assert!(sink.remember(None));
        assert!(!sink.remember(None));
        assert!(sink.remember(Some(&payload("gym"))));
    }

    #[tokio::test]
    async fn log_sink_never_fails() {
        let sink = LogSink::new();
        assert!(sink.set_activity(&payload("gym")).await.is_ok());
        assert!(sink.set_activity(&payload("gym")).await.is_ok());
        assert!(sink.clear_activity().await.is_ok());
    }
}
