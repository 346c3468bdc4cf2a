//! gymsync-presence: mirrors a GymSync activity status into a presence
//! display.
//!
//! A [`PresenceReconciler`] polls a [`StatusSource`] for one user and turns
//! each answer into a [`PresencePayload`] for a [`PresenceSink`], keeping the
//! displayed start time stable across polls of the same activity.

pub mod activity;
pub mod reconciler;
pub mod sink;
pub mod source;
pub mod state;

#[cfg(feature = "discord")]
pub mod discord;

pub use activity::{
    image_key_for, ActiveStatus, PresenceButton, PresenceParty, PresencePayload, DEFAULT_IMAGE_KEY,
};
pub use reconciler::{DisplaySettings, PresenceReconciler, TickOutcome};
pub use sink::{LogSink, PresenceSink, SinkError};
pub use source::{HttpStatusClient, SourceError, StatusSource};
pub use state::ClientPresenceState;

#[cfg(feature = "discord")]
pub use discord::DiscordSink;
