use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateFoodEntry, EntriesQuery, RecentQuery, UpdateFoodEntry};
use super::repo;
use super::repo_types::{FoodEntry, RecentFood};
use super::services;
use crate::auth::AuthUser;
use crate::daily_logs::services::ensure_owned;
use crate::error::AppResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/food-entries", get(list_entries).post(create_entry))
        .route("/food-entries/recent", get(recent_foods))
        .route("/food-entries/:id", put(update_entry).delete(delete_entry))
}

/// GET /food-entries?daily_log_id=..
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<EntriesQuery>,
) -> AppResult<Json<Vec<FoodEntry>>> {
    ensure_owned(&state, user_id, q.daily_log_id).await?;
    Ok(Json(repo::list_by_log(&state.db, q.daily_log_id).await?))
}

#[instrument(skip(state, req), fields(log_id = %req.daily_log_id))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateFoodEntry>,
) -> AppResult<(StatusCode, Json<FoodEntry>)> {
    let entry = services::create_entry(&state, user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, req))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFoodEntry>,
) -> AppResult<Json<FoodEntry>> {
    Ok(Json(services::update_entry(&state, user_id, id, req).await?))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_entry(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn recent_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecentQuery>,
) -> AppResult<Json<Vec<RecentFood>>> {
    let limit = q.limit.clamp(1, 100);
    Ok(Json(repo::recent(&state.db, user_id, limit).await?))
}
