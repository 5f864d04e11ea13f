use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateDailyLog, UpdateDailyLog};
use super::repo::{self, NewDailyLog};
use super::repo_types::DailyLog;
use super::services;
use crate::auth::AuthUser;
use crate::dates::parse_date;
use crate::error::{AppError, AppResult};
use crate::profile;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily-logs", get(list_logs).post(create_log))
        // GET takes a YYYY-MM-DD date, PUT/DELETE a log id
        .route(
            "/daily-logs/:key",
            get(get_log_by_date).put(update_log).delete(delete_log),
        )
}

#[instrument(skip(state))]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<DailyLog>>> {
    Ok(Json(repo::list_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_log_by_date(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> AppResult<Json<DailyLog>> {
    let date = parse_date(&date)?;
    Ok(Json(services::get_or_create(&state, user_id, date).await?))
}

#[instrument(skip(state, body))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateDailyLog>,
) -> AppResult<(StatusCode, Json<DailyLog>)> {
    let date = body.date.unwrap_or_else(services::today);
    let targets = profile::targets_for_user(&state.db, user_id).await?;
    let fields = NewDailyLog {
        total_water_ml: body.total_water_ml,
        exercise_minutes: body.exercise_minutes,
        notes: &body.notes,
    };
    let log = repo::insert(&state.db, user_id, date, &targets, &fields)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("A log for {date} already exists")))?;
    info!(%user_id, log_id = %log.id, %date, "daily log created");
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state, patch))]
pub async fn update_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(log_id): Path<Uuid>,
    Json(patch): Json<UpdateDailyLog>,
) -> AppResult<Json<DailyLog>> {
    let log = repo::update(&state.db, user_id, log_id, &patch)
        .await?
        .ok_or(AppError::NotFound("Daily log"))?;
    Ok(Json(log))
}

/// Food entries, supplements and exercises go with the log.
#[instrument(skip(state))]
pub async fn delete_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(log_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_owned(&state.db, user_id, log_id).await? {
        return Err(AppError::NotFound("Daily log"));
    }
    info!(%user_id, %log_id, "daily log deleted");
    Ok(StatusCode::NO_CONTENT)
}
