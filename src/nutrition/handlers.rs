use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{DayNutrition, HistoryQuery, SetVitaminTarget};
use super::repo;
use super::repo_types::{HistoryDay, VitaminTarget};
use super::services::aggregate_nutrition;
use crate::auth::AuthUser;
use crate::daily_logs::services::find_for_date;
use crate::dates::parse_date;
use crate::error::{AppError, AppResult};
use crate::food_entries::repo as food_repo;
use crate::state::AppState;
use crate::supplements::repo as supplements_repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/targets", get(list_targets).post(set_target))
        .route("/nutrition/targets/:id", delete(delete_target))
        .route("/nutrition/history", get(history))
        .route("/nutrition/:date", get(day_breakdown))
}

/// GET /nutrition/:date. Read only: a date without a log is a 404.
#[instrument(skip(state))]
pub async fn day_breakdown(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> AppResult<Json<DayNutrition>> {
    let date = parse_date(&date)?;
    let daily_log = find_for_date(&state, user_id, date).await?;
    let food_entries = food_repo::list_by_log(&state.db, daily_log.id).await?;
    let supplements = supplements_repo::list_by_log(&state.db, daily_log.id).await?;
    let breakdown = aggregate_nutrition(&food_entries, &supplements);

    Ok(Json(DayNutrition {
        date,
        daily_log,
        breakdown,
        food_entries,
        supplements,
    }))
}

#[instrument(skip(state))]
pub async fn list_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<VitaminTarget>>> {
    Ok(Json(repo::list_targets(&state.db, user_id).await?))
}

#[instrument(skip(state, req))]
pub async fn set_target(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<SetVitaminTarget>,
) -> AppResult<(StatusCode, Json<VitaminTarget>)> {
    req.validate()?;
    let target = repo::upsert_target(
        &state.db,
        user_id,
        req.nutrient_name.trim(),
        req.target_amount,
        req.unit.trim(),
    )
    .await?;
    info!(%user_id, nutrient = %target.nutrient_name, "vitamin target set");
    Ok((StatusCode::CREATED, Json(target)))
}

#[instrument(skip(state))]
pub async fn delete_target(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_target_owned(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Vitamin target"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> AppResult<Json<Vec<HistoryDay>>> {
    let (start, end) = q.range()?;
    Ok(Json(repo::history(&state.db, user_id, start, end).await?))
}
