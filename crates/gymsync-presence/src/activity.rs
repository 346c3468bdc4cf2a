//! Remote status interpretation and presence payload composition.

use serde::Serialize;
use serde_json::Value;

/// Image shown when no activity keyword matches.
pub const DEFAULT_IMAGE_KEY: &str = "gymsync_logo";

/// Activity keywords and their image keys, checked in order.
const ACTIVITY_IMAGES: &[(&str, &str)] = &[
    ("running", "running"),
    ("cycling", "cycling"),
    ("gym", "gym"),
];

/// Image key for an activity label: the first table keyword contained in
/// the lowercased label, or [`DEFAULT_IMAGE_KEY`].
pub fn image_key_for(activity: &str) -> &'static str {
    let label = activity.to_lowercase();
    ACTIVITY_IMAGES
        .iter()
        .find(|(keyword, _)| label.contains(keyword))
        .map(|(_, key)| *key)
        .unwrap_or(DEFAULT_IMAGE_KEY)
}

/// A usable status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStatus {
    pub activity: String,
    pub paused: bool,
    pub elapsed_seconds: i64,
}

impl ActiveStatus {
    /// Interpret a status body leniently.
    ///
    /// Returns `None` unless `activity` is a non-empty string and `time` is a
    /// number. Fractional times are floored and negative ones clamp to zero.
    pub fn from_value(value: &Value) -> Option<Self> {
        let activity = value.get("activity")?.as_str()?;
        if activity.is_empty() {
            return None;
        }
        let time = value.get("time")?.as_f64()?;
        if !time.is_finite() {
            return None;
        }
        let paused = value.get("paused").and_then(Value::as_bool).unwrap_or(false);

        Some(Self {
            activity: activity.to_string(),
            paused,
            elapsed_seconds: time.max(0.0).floor() as i64,
        })
    }

    /// Second line of the presence: the label, decorated while paused.
    pub fn detail(&self) -> String {
        if self.paused {
            format!("[⏸️ Paused] {}", self.activity)
        } else {
            self.activity.clone()
        }
    }
}

/// Link button attached to the presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceButton {
    pub label: String,
    pub url: String,
}

/// Solo party attached to the presence, keyed by the mirrored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceParty {
    pub id: String,
    pub size: u32,
    pub max: u32,
}

impl PresenceParty {
    /// One-member party `gymsync-party-<user_id>`.
    pub fn solo(user_id: &str) -> Self {
        Self {
            id: format!("gymsync-party-{user_id}"),
            size: 1,
            max: 1,
        }
    }
}

/// Everything a sink needs to render one presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresencePayload {
    /// First line (the configured title).
    pub state: String,
    /// Second line (activity, possibly marked as paused).
    pub details: String,
    /// Epoch seconds the running timer counts from; absent while paused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,
    pub large_image_key: String,
    /// Hover text of the large image.
    pub large_image_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<PresenceButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<PresenceParty>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_key_matches_case_insensitive_substrings() {
        assert_eq!(image_key_for("running"), "running");
        assert_eq!(image_key_for("Morning RUNNING session"), "running");
        assert_eq!(image_key_for("Indoor Cycling"), "cycling");
        assert_eq!(image_key_for("GYM"), "gym");
        assert_eq!(image_key_for("swimming"), DEFAULT_IMAGE_KEY);
        assert_eq!(image_key_for(""), DEFAULT_IMAGE_KEY);
    }

    #[test]
    fn image_key_uses_table_order() {
        assert_eq!(image_key_for("gym then running"), "running");
    }

    #[test]
    fn parses_backend_body() {
        let status =
            ActiveStatus::from_value(&json!({"activity": "running", "paused": false, "time": 42}))
                .unwrap();
        assert_eq!(status.activity, "running");
        assert!(!status.paused);
        assert_eq!(status.elapsed_seconds, 42);
    }

    #[test]
    fn rejects_unusable_bodies() {
        let cases = [
            json!({}),
            json!({"activity": "", "time": 1}),
            json!({"activity": 7, "time": 1}),
            json!({"activity": "running"}),
            json!({"activity": "running", "time": "12"}),
            json!(null),
        ];
        for body in cases {
            assert_eq!(ActiveStatus::from_value(&body), None, "{body}");
        }
    }

    #[test]
    fn lenient_numbers_and_flags() {
        let status =
            ActiveStatus::from_value(&json!({"activity": "gym", "time": 12.9, "paused": "yes"}))
                .unwrap();
        assert_eq!(status.elapsed_seconds, 12);
        assert!(!status.paused);

        let status = ActiveStatus::from_value(&json!({"activity": "gym", "time": -5})).unwrap();
        assert_eq!(status.elapsed_seconds, 0);
    }

    #[test]
    fn solo_party_is_keyed_by_user() {
        let party = PresenceParty::solo("123456789");
        assert_eq!(party.id, "gymsync-party-123456789");
        assert_eq!((party.size, party.max), (1, 1));
    }

    #[test]
    fn detail_marks_paused() {
        let mut status = ActiveStatus {
            activity: "running".into(),
            paused: false,
            elapsed_seconds: 0,
        };
        assert_eq!(status.detail(), "running");
        status.paused = true;
        assert_eq!(status.detail(), "[⏸️ Paused] running");
    }
}
