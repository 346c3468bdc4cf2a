//! Wire types shared by the status backend and the presence client.
//!
//! Request bodies keep every field optional so that shape validation happens
//! in one place (the backend's API layer) and yields `Invalid payload`
//! instead of a deserializer message.

use serde::{Deserialize, Serialize};

/// Plain-text body served on `GET /`.
pub const BANNER: &str = "✅ GymSync Backend is running!";

/// HTTP paths of the status API.
pub mod routes {
    pub const ROOT: &str = "/";
    pub const STATUS: &str = "/api/v1/status";
    pub const PAUSE: &str = "/api/v1/status/pause";
    pub const RESUME: &str = "/api/v1/status/resume";
    pub const STOP: &str = "/api/v1/status/stop";
    /// Router pattern for the per-user lookup.
    pub const STATUS_OF: &str = "/api/v1/status/{discord_id}";
}

/// Body of `POST /api/v1/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStatusRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFields>,
}

/// The `status` object inside a create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

/// Body of the pause / resume / stop calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
}

/// Response of `GET /api/v1/status/{discord_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub activity: String,
    pub paused: bool,
    /// Active (non-paused) seconds since the activity was created.
    pub time: u64,
}

/// `{ "ok": true }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkBody {
    pub ok: bool,
}

impl OkBody {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl CreateStatusRequest {
    pub fn new(discord_id: impl Into<String>, activity: impl Into<String>, paused: bool) -> Self {
        Self {
            discord_id: Some(discord_id.into()),
            status: Some(StatusFields {
                activity: Some(activity.into()),
                paused: paused.then_some(true),
            }),
        }
    }
}

impl UserRequest {
    pub fn new(discord_id: impl Into<String>) -> Self {
        Self {
            discord_id: Some(discord_id.into()),
        }
    }
}
