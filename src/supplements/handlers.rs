use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateSupplement, SupplementFields, SupplementsQuery};
use super::repo;
use super::repo_types::Supplement;
use crate::ai;
use crate::auth::AuthUser;
use crate::daily_logs::services::ensure_owned;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/supplements", get(list_supplements).post(create_supplement))
        .route("/supplements/recent", get(recent_supplements))
        .route(
            "/supplements/:id",
            put(update_supplement).delete(delete_supplement),
        )
}

/// GET /supplements?daily_log_id=..
#[instrument(skip(state))]
pub async fn list_supplements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<SupplementsQuery>,
) -> AppResult<Json<Vec<Supplement>>> {
    ensure_owned(&state, user_id, q.daily_log_id).await?;
    Ok(Json(repo::list_by_log(&state.db, q.daily_log_id).await?))
}

#[instrument(skip(state))]
pub async fn recent_supplements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Supplement>>> {
    Ok(Json(repo::recent(&state.db, user_id).await?))
}

/// The seven tracked amounts are estimated from name and dosage.
#[instrument(skip(state, req), fields(log_id = %req.daily_log_id))]
pub async fn create_supplement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<CreateSupplement>,
) -> AppResult<(StatusCode, Json<Supplement>)> {
    req.fields.validate()?;
    ensure_owned(&state, user_id, req.daily_log_id).await?;

    let micros = ai::supplement_micros_or_zero(
        state.advisor.as_ref(),
        req.fields.name.trim(),
        &req.fields.dosage,
    )
    .await;
    let supplement = repo::insert(&state.db, &req, &micros).await?;
    info!(%user_id, supplement_id = %supplement.id, "supplement logged");
    Ok((StatusCode::CREATED, Json(supplement)))
}

#[instrument(skip(state, fields))]
pub async fn update_supplement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(fields): Json<SupplementFields>,
) -> AppResult<Json<Supplement>> {
    fields.validate()?;
    let supplement = repo::update_owned(&state.db, user_id, id, &fields)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    Ok(Json(supplement))
}

#[instrument(skip(state))]
pub async fn delete_supplement(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_owned(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Supplement"));
    }
    info!(%user_id, supplement_id = %id, "supplement deleted");
    Ok(StatusCode::NO_CONTENT)
}
