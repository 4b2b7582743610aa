//! Typed API failures + axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request fields. No state was changed.
    #[error("validation failure: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. username already taken).
    /// Surfaced to the client as 400 with an empty body; the detail is
    /// only logged.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, malformed, or unrecognized bearer token.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence or hashing layer failure. The client only ever sees a
    /// generic 500.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST.into_response(),
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Invalid or missing token").into_response()
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request_with_empty_body() {
        let res = ApiError::Conflict("username taken".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let res = ApiError::Unauthenticated.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_hides_the_cause() {
        let res = ApiError::Internal(anyhow::anyhow!("pool timed out")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
