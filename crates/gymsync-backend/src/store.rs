//! Status store: maps user ids to their current activity record.
//!
//! The store runs no timer. Elapsed time is derived on read from the
//! instant the current running segment began plus whatever was accrued
//! before the last pause. Mutation needs `&mut self`; callers sharing a
//! store across tasks wrap it in a lock (see [`crate::api::StatusApi`]).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gymsync_common::StatusError;

use crate::clock::{Clock, SystemClock};

/// One user's active session.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub activity: String,
    /// Instant the activity was created or last resumed.
    pub started_at: Instant,
    /// Active time accrued before `started_at`.
    accrued: Duration,
    pub paused: bool,
}

impl StatusRecord {
    fn new(activity: String, paused: bool, now: Instant) -> Self {
        Self {
            activity,
            started_at: now,
            accrued: Duration::ZERO,
            paused,
        }
    }

    /// Active (non-paused) time as of `now`.
    pub fn elapsed(&self, now: Instant) -> Duration {
        if self.paused {
            self.accrued
        } else {
            self.accrued + now.saturating_duration_since(self.started_at)
        }
    }

    fn pause(&mut self, now: Instant) {
        if !self.paused {
            self.accrued = self.elapsed(now);
            self.paused = true;
        }
    }

    fn resume(&mut self, now: Instant) {
        if self.paused {
            self.started_at = now;
            self.paused = false;
        }
    }
}

/// Point-in-time view of a record returned by [`StatusStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub activity: String,
    pub elapsed_seconds: u64,
    pub paused: bool,
}

/// In-memory status records keyed by user id.
pub struct StatusStore {
    records: HashMap<String, StatusRecord>,
    clock: Arc<dyn Clock>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            clock,
        }
    }

    /// Start a fresh session, replacing any existing one for `user_id`.
    pub fn create(&mut self, user_id: &str, activity: &str, paused: bool) {
        let record = StatusRecord::new(activity.to_string(), paused, self.clock.now());
        if self.records.insert(user_id.to_string(), record).is_some() {
            tracing::debug!(user_id, "replaced existing status");
        }
    }

    /// Freeze elapsed-time accrual. Pausing twice is a no-op.
    pub fn pause(&mut self, user_id: &str) -> Result<(), StatusError> {
        let now = self.clock.now();
        let record = self.records.get_mut(user_id).ok_or(StatusError::NotFound)?;
        record.pause(now);
        Ok(())
    }

    /// Continue elapsed-time accrual. Resuming a running session is a no-op.
    pub fn resume(&mut self, user_id: &str) -> Result<(), StatusError> {
        let now = self.clock.now();
        let record = self.records.get_mut(user_id).ok_or(StatusError::NotFound)?;
        record.resume(now);
        Ok(())
    }

    /// End the session and forget the record.
    pub fn stop(&mut self, user_id: &str) -> Result<(), StatusError> {
        self.records
            .remove(user_id)
            .map(|_| ())
            .ok_or(StatusError::NotFound)
    }

    pub fn get(&self, user_id: &str) -> Result<StatusSnapshot, StatusError> {
        let record = self.records.get(user_id).ok_or(StatusError::NotFound)?;
        Ok(StatusSnapshot {
            activity: record.activity.clone(),
            elapsed_seconds: record.elapsed(self.clock.now()).as_secs(),
            paused: record.paused,
        })
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
