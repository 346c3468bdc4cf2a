//! Request/response mapping over the status store.
//!
//! Every mutating call checks the shared-secret bearer credential first and
//! the payload shape second, then performs exactly one store mutation.
//! Store `NotFound` passes through unchanged for the transport to map.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use gymsync_common::{CreateStatusRequest, StatusError, StatusView, UserRequest};

use crate::store::StatusStore;

/// Shared handle to the store plus the expected credential.
#[derive(Clone)]
pub struct StatusApi {
    store: Arc<RwLock<StatusStore>>,
    api_key: Arc<str>,
}

impl StatusApi {
    pub fn new(store: StatusStore, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            api_key: api_key.into(),
        }
    }

    /// Check an `Authorization` header value against `Bearer <api_key>`.
    ///
    /// An empty configured key rejects everything.
    pub fn authorize(&self, authorization: Option<&str>) -> Result<(), StatusError> {
        if self.api_key.is_empty() {
            return Err(StatusError::Unauthorized);
        }
        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusError::Unauthorized)?;

        if bool::from(token.as_bytes().ct_eq(self.api_key.as_bytes())) {
            Ok(())
        } else {
            Err(StatusError::Unauthorized)
        }
    }

    /// `payload` is `None` when the body could not be decoded at all.
    pub async fn create(
        &self,
        authorization: Option<&str>,
        payload: Option<CreateStatusRequest>,
    ) -> Result<(), StatusError> {
        self.authorize(authorization)?;
        let payload = payload.ok_or(StatusError::InvalidPayload)?;
        let user_id = required(payload.discord_id.as_deref())?;
        let status = payload.status.ok_or(StatusError::InvalidPayload)?;
        let activity = required(status.activity.as_deref())?;
        let paused = status.paused.unwrap_or(false);

        self.store.write().await.create(user_id, activity, paused);
        tracing::info!(user_id, activity, paused, "status created");
        Ok(())
    }

    pub async fn pause(
        &self,
        authorization: Option<&str>,
        payload: Option<UserRequest>,
    ) -> Result<(), StatusError> {
        let user_id = self.authorized_user(authorization, &payload)?;
        self.store.write().await.pause(user_id)?;
        tracing::info!(user_id, "status paused");
        Ok(())
    }

    pub async fn resume(
        &self,
        authorization: Option<&str>,
        payload: Option<UserRequest>,
    ) -> Result<(), StatusError> {
        let user_id = self.authorized_user(authorization, &payload)?;
        self.store.write().await.resume(user_id)?;
        tracing::info!(user_id, "status resumed");
        Ok(())
    }

    pub async fn stop(
        &self,
        authorization: Option<&str>,
        payload: Option<UserRequest>,
    ) -> Result<(), StatusError> {
        let user_id = self.authorized_user(authorization, &payload)?;
        self.store.write().await.stop(user_id)?;
        tracing::info!(user_id, "status stopped");
        Ok(())
    }

    /// Unauthenticated read used by the presence client.
    pub async fn get(&self, user_id: &str) -> Result<StatusView, StatusError> {
        let snapshot = self.store.read().await.get(user_id)?;
        Ok(StatusView {
            activity: snapshot.activity,
            paused: snapshot.paused,
            time: snapshot.elapsed_seconds,
        })
    }

    /// Number of active sessions.
    pub async fn active_sessions(&self) -> usize {
        self.store.read().await.len()
    }

    fn authorized_user<'a>(
        &self,
        authorization: Option<&str>,
        payload: &'a Option<UserRequest>,
    ) -> Result<&'a str, StatusError> {
        self.authorize(authorization)?;
        let payload = payload.as_ref().ok_or(StatusError::InvalidPayload)?;
        required(payload.discord_id.as_deref())
    }
}

fn required(value: Option<&str>) -> Result<&str, StatusError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(StatusError::InvalidPayload),
    }
}
