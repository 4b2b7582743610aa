use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    quizzes::{
        dto::{CreateQuizRequest, UpdateQuizRequest},
        repo_types::Quiz,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes))
        .route("/quizzes/:id", get(get_quiz))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", post(create_quiz))
        .route("/quizzes/:id", put(update_quiz).delete(delete_quiz))
}

#[instrument(skip(state, _auth))]
pub async fn list_quizzes(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Quiz>>, ApiError> {
    let quizzes = Quiz::list_all(&state.db).await?;
    Ok(Json(quizzes))
}

#[instrument(skip(state, _auth))]
pub async fn get_quiz(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    match Quiz::find_by_id(&state.db, id).await? {
        Some(quiz) => Ok(Json(quiz)),
        None => Err(ApiError::NotFound("Quiz not found".into())),
    }
}

#[instrument(skip(state, _auth, payload))]
pub async fn create_quiz(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    let quiz = Quiz::create(&state.db, &payload.title, payload.description.as_deref()).await?;
    info!(quiz_id = %quiz.id, "quiz created");
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[instrument(skip(state, _auth, payload))]
pub async fn update_quiz(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<Json<Quiz>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".into()));
    }
    match Quiz::update(&state.db, id, &payload.title, payload.description.as_deref()).await? {
        Some(quiz) => {
            info!(quiz_id = %quiz.id, "quiz updated");
            Ok(Json(quiz))
        }
        None => Err(ApiError::NotFound("Quiz not found".into())),
    }
}

#[instrument(skip(state, _auth))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if Quiz::delete(&state.db, id).await? {
        info!(quiz_id = %id, "quiz deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Quiz not found".into()))
    }
}
