//! Desktop presence client configuration.

use serde::{Deserialize, Serialize};

/// Title shown when none is configured.
pub const DEFAULT_TITLE: &str = "GymSync";

/// Trim `raw`, falling back to [`DEFAULT_TITLE`] when nothing is left.
pub fn normalize_title(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_TITLE.to_string(),
        title => title.to_string(),
    }
}

/// Where presence updates are published.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Discord Rich Presence over local IPC.
    #[default]
    Discord,
    /// Presence changes written to the log only.
    Log,
}

/// Settings for `gymsync-presence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Base status URL; the user id is appended as the last path segment.
    pub backend_url: String,
    /// Discord user id whose status is mirrored.
    pub discord_id: String,
    /// Discord application id used for Rich Presence.
    pub client_id: i64,
    /// First line of the displayed presence.
    pub title: String,
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub sink: SinkKind,
    pub button_label: String,
    pub button_url: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://gymsync-backend-orcin.vercel.app/api/v1/status".into(),
            discord_id: String::new(),
            client_id: 1391871101734223912,
            title: DEFAULT_TITLE.into(),
            poll_interval_ms: 1000,
            request_timeout_secs: 5,
            sink: SinkKind::Discord,
            button_label: "Check GymSync".into(),
            button_url: "https://github.com/TheusHen/GymSync".into(),
        }
    }
}
