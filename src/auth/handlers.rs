use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserDto},
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo::is_unique_violation,
        repo_types::User,
        service::is_valid_email,
        token::generate_session_token,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if !is_valid_email(&payload.email_address) {
        warn!(email = %payload.email_address, "invalid email");
        return Err(ApiError::Validation("Invalid email address".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }
    if payload.fullname.trim().is_empty() {
        return Err(ApiError::Validation("Fullname is required".into()));
    }

    // Reject a taken username before any hashing work. The unique
    // constraint below still backstops two registrations racing past this
    // check.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(
        &state.db,
        &payload.username,
        &payload.email_address,
        &payload.fullname,
        &hash,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %payload.username, "registration lost a uniqueness race");
            return Err(ApiError::Conflict("username or email already taken".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal(e));
        }
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    let user = match User::find_by_email(&state.db, &payload.email_address).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email_address, "login unknown email");
            return (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::failure("401", "User not found")),
            );
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::failure("500", "Internal server error")),
            );
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::failure("500", "Internal server error")),
            );
        }
    };

    if !ok {
        warn!(email = %payload.email_address, user_id = %user.id, "login invalid password");
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse::failure("401", "Invalid credentials")),
        );
    }

    // Overwrites any previous token: one active session per user, and the
    // old token stops verifying the moment this lands.
    let token = generate_session_token(state.config.auth.token_length);
    match User::set_session_token(&state.db, user.id, &token).await {
        Ok(user) => {
            info!(user_id = %user.id, "user logged in");
            (
                StatusCode::OK,
                Json(LoginResponse {
                    status_code: "200".into(),
                    message: user.email_address,
                    session_token: token,
                }),
            )
        }
        Err(e) => {
            // Fail closed: the caller gets no token if the save failed,
            // including the freak case of a generated-token collision.
            error!(error = %e, user_id = %user.id, "persisting session token failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::failure("500", "Internal server error")),
            )
        }
    }
}

#[instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserDto> {
    Json(UserDto::from(user))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    if let Some(username) = payload.username.as_deref() {
        if username.trim().is_empty() {
            return Err(ApiError::Validation("Username must not be empty".into()));
        }
    }

    let updated = match User::update_profile(
        &state.db,
        id,
        payload.username.as_deref(),
        payload.fullname.as_deref(),
        payload.user_role,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(%id, "profile update hit a uniqueness conflict");
            return Err(ApiError::Conflict("username already taken".into()));
        }
        Err(e) => return Err(ApiError::Internal(e)),
    };

    match updated {
        Some(user) => {
            info!(user_id = %user.id, "user profile updated");
            Ok(Json(UserDto::from(user)))
        }
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

#[instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if User::delete(&state.db, id).await? {
        info!(user_id = %id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User not found".into()))
    }
}
