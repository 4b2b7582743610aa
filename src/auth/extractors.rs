use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use tracing::warn;

use crate::auth::{repo_types::User, service};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the bearer token and resolves it to the authenticated user.
/// Handlers that take this extractor are gated: requests without a live
/// session token are rejected with 401 before the handler body runs.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = service::extract_token(auth_header);
        match service::verify_token(&state.db, token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("missing or unrecognized bearer token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
