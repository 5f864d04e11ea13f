use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateWeightLog, WeightLogsQuery};
use super::repo;
use super::repo_types::WeightLog;
use crate::auth::AuthUser;
use crate::daily_logs::services::today;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/weight-logs", get(list_weight_logs).post(log_weight))
        .route("/weight-logs/latest", get(latest_weight))
        .route("/weight-logs/:id", delete(delete_weight_log))
}

/// GET /weight-logs?start_date=..&end_date=..
#[instrument(skip(state))]
pub async fn list_weight_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WeightLogsQuery>,
) -> AppResult<Json<Vec<WeightLog>>> {
    let range = q.range()?;
    Ok(Json(repo::list(&state.db, user_id, range).await?))
}

#[instrument(skip(state, req))]
pub async fn log_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateWeightLog>,
) -> AppResult<(StatusCode, Json<WeightLog>)> {
    req.validate()?;
    let date = req.date.unwrap_or_else(today);
    let log = repo::upsert(&state.db, user_id, date, req.weight_kg, req.notes.trim()).await?;
    info!(%user_id, %date, weight_kg = log.weight_kg, "weight logged");
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn latest_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<WeightLog>> {
    let log = repo::latest(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Weight log"))?;
    Ok(Json(log))
}

#[instrument(skip(state))]
pub async fn delete_weight_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_owned(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Weight log"));
    }
    info!(%user_id, weight_log_id = %id, "weight log deleted");
    Ok(StatusCode::NO_CONTENT)
}
