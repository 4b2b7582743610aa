//! Secured service endpoints: health, application info, operational status.
//! Each one resolves the caller through the bearer token and echoes the
//! authenticated user back alongside the payload.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::instrument;

use crate::auth::{dto::UserDto, extractors::AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub user: UserDto,
    pub data: T,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(app_info))
        .route("/status", get(service_status))
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[instrument(skip_all)]
pub async fn health_check(AuthUser(user): AuthUser) -> Json<AuthenticatedResponse<Value>> {
    Json(AuthenticatedResponse {
        status: "200".into(),
        message: "Service is healthy".into(),
        user: UserDto::from(user),
        data: json!({
            "status": "UP",
            "service": "QuizPilot",
            "timestamp": now_millis().to_string(),
        }),
    })
}

#[instrument(skip_all)]
pub async fn app_info(AuthUser(user): AuthUser) -> Json<AuthenticatedResponse<Value>> {
    Json(AuthenticatedResponse {
        status: "200".into(),
        message: "Application information retrieved successfully".into(),
        user: UserDto::from(user),
        data: json!({
            "application": "QuizPilot",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Interactive Quiz Application API",
            "apiVersion": "v1",
        }),
    })
}

#[instrument(skip_all)]
pub async fn service_status(AuthUser(user): AuthUser) -> Json<AuthenticatedResponse<Value>> {
    Json(AuthenticatedResponse {
        status: "200".into(),
        message: "Service status retrieved successfully".into(),
        user: UserDto::from(user),
        data: json!({
            "status": "operational",
            "uptime": "Running",
            "database": "connected",
            "lastUpdated": now_millis().to_string(),
        }),
    })
}
