use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateExercise, ExerciseFields, ExercisesQuery};
use super::repo_types::Exercise;
use super::{repo, services};
use crate::auth::AuthUser;
use crate::daily_logs::services::ensure_owned;
use crate::error::AppResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route("/exercises/:id", put(update_exercise).delete(delete_exercise))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ExercisesQuery>,
) -> AppResult<Json<Vec<Exercise>>> {
    ensure_owned(&state, user_id, q.daily_log_id).await?;
    Ok(Json(repo::list_by_log(&state.db, q.daily_log_id).await?))
}

#[instrument(skip(state, req), fields(log_id = %req.daily_log_id))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateExercise>,
) -> AppResult<(StatusCode, Json<Exercise>)> {
    let exercise = services::create_exercise(&state, user_id, req).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

#[instrument(skip(state, fields))]
pub async fn update_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(fields): Json<ExerciseFields>,
) -> AppResult<Json<Exercise>> {
    Ok(Json(services::update_exercise(&state, user_id, id, fields).await?))
}

#[instrument(skip(state))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_exercise(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
