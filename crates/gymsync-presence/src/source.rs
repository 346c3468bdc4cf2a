//! Where the reconciler reads remote status from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use gymsync_common::{CreateStatusRequest, ErrorBody, UserRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Protocol(String),

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Read access to one user's remote status.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw status body for `user_id`.
    ///
    /// `Ok(None)` means the backend has no session for the user, which is
    /// the normal idle state rather than a failure.
    async fn fetch(&self, user_id: &str) -> Result<Option<Value>, SourceError>;
}

/// HTTP client for the status backend.
#[derive(Clone)]
pub struct HttpStatusClient {
    base_url: Url,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl std::fmt::Debug for HttpStatusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatusClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpStatusClient {
    /// `base_url` is the status collection URL, e.g.
    /// `https://host/api/v1/status`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            api_key: None,
            http,
        })
    }

    /// Shared secret sent as a bearer token on mutating calls.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// `POST {base}`: start a session.
    pub async fn create(&self, user_id: &str, activity: &str, paused: bool) -> Result<(), SourceError> {
        let body = CreateStatusRequest::new(user_id, activity, paused);
        self.post(self.base_url.clone(), &body).await
    }

    /// `POST {base}/pause`
    pub async fn pause(&self, user_id: &str) -> Result<(), SourceError> {
        self.post(self.endpoint("pause")?, &UserRequest::new(user_id)).await
    }

    /// `POST {base}/resume`
    pub async fn resume(&self, user_id: &str) -> Result<(), SourceError> {
        self.post(self.endpoint("resume")?, &UserRequest::new(user_id)).await
    }

    /// `POST {base}/stop`
    pub async fn stop(&self, user_id: &str) -> Result<(), SourceError> {
        self.post(self.endpoint("stop")?, &UserRequest::new(user_id)).await
    }

    /// `{base}/{segment}` with `segment` percent-encoded.
    fn endpoint(&self, segment: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn post<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), SourceError> {
        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(network_error)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch(&self, user_id: &str) -> Result<Option<Value>, SourceError> {
        let url = self.endpoint(user_id)?;
        let response = self.http.get(url).send().await.map_err(network_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Value>()
                .await
                .map(Some)
                .map_err(|e| SourceError::Protocol(e.to_string())),
            _ => Err(rejection(response).await),
        }
    }
}

fn network_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Network(format!("request timed out: {err}"))
    } else {
        SourceError::Network(err.to_string())
    }
}

async fn rejection(response: reqwest::Response) -> SourceError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                text
            }
        });
    SourceError::Rejected {
        status: status.as_u16(),
        message,
    }
}
