//! HTTP surface of the status backend.
//!
//! Thin axum handlers that pull the `Authorization` header and JSON body
//! out of the request and hand them to [`StatusApi`]. Errors are mapped to
//! `{ "error": ... }` bodies here; nothing escapes unmapped.

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use gymsync_common::{
    routes, CreateStatusRequest, ErrorBody, OkBody, StatusError, StatusView, UserRequest, BANNER,
};

use crate::api::StatusApi;

/// Transport wrapper so `StatusError` can become a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError(pub StatusError);

impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            StatusError::Unauthorized => StatusCode::UNAUTHORIZED,
            StatusError::InvalidPayload => StatusCode::BAD_REQUEST,
            StatusError::NotFound => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorBody::new(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the router with every status route.
pub fn router(api: StatusApi, body_limit: usize) -> Router {
    Router::new()
        .route(routes::ROOT, get(banner))
        .route(routes::STATUS, post(create_status))
        .route(routes::PAUSE, post(pause_status))
        .route(routes::RESUME, post(resume_status))
        .route(routes::STOP, post(stop_status))
        .route(routes::STATUS_OF, get(get_status))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Option<T> {
    match payload {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            None
        }
    }
}

/// Unknown paths and wrong methods answer like an unknown status.
async fn not_found() -> ApiError {
    ApiError(StatusError::NotFound)
}

/// GET /
async fn banner() -> &'static str {
    BANNER
}

/// POST /api/v1/status
async fn create_status(
    State(api): State<StatusApi>,
    headers: HeaderMap,
    payload: Result<Json<CreateStatusRequest>, JsonRejection>,
) -> ApiResult<OkBody> {
    api.create(bearer(&headers), body(payload)).await?;
    Ok(Json(OkBody::ok()))
}

/// POST /api/v1/status/pause
async fn pause_status(
    State(api): State<StatusApi>,
    headers: HeaderMap,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<OkBody> {
    api.pause(bearer(&headers), body(payload)).await?;
    Ok(Json(OkBody::ok()))
}

/// POST /api/v1/status/resume
async fn resume_status(
    State(api): State<StatusApi>,
    headers: HeaderMap,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<OkBody> {
    api.resume(bearer(&headers), body(payload)).await?;
    Ok(Json(OkBody::ok()))
}

/// POST /api/v1/status/stop
async fn stop_status(
    State(api): State<StatusApi>,
    headers: HeaderMap,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ApiResult<OkBody> {
    api.stop(bearer(&headers), body(payload)).await?;
    Ok(Json(OkBody::ok()))
}

/// GET /api/v1/status/{discord_id}
async fn get_status(
    State(api): State<StatusApi>,
    Path(discord_id): Path<String>,
) -> ApiResult<StatusView> {
    Ok(Json(api.get(&discord_id).await?))
}
