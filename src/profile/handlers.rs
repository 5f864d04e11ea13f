use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CalculationsResponse, DayTargetsUpdated, ProfileRequest};
use super::repo;
use super::repo_types::UserProfile;
use super::services::{self, ResolvedTargets};
use crate::auth::AuthUser;
use crate::calculations::{calorie_goal, round_whole};
use crate::daily_logs::repo as daily_logs_repo;
use crate::dates::parse_date;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).post(save_profile).put(save_profile),
        )
        .route("/profile/targets", get(get_targets))
        .route("/profile/calculations", get(get_calculations))
        .route("/profile/update-day-targets/:date", post(update_day_targets))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;
    Ok(Json(profile))
}

/// Create or update; 201 on first save.
#[instrument(skip(state, req))]
pub async fn save_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<ProfileRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    req.validate()?;
    let saved = services::save_profile(&state, user_id, &req).await?;
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved.profile)))
}

#[instrument(skip(state))]
pub async fn get_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ResolvedTargets>> {
    Ok(Json(services::targets_for_user(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_calculations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<CalculationsResponse>> {
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;
    Ok(Json(calculations_for(&profile)))
}

fn calculations_for(profile: &UserProfile) -> CalculationsResponse {
    let goal = profile.goal();
    CalculationsResponse {
        bmr: round_whole(profile.bmr),
        tdee: round_whole(profile.tdee),
        calorie_goal: round_whole(calorie_goal(profile.tdee, goal)),
        goal,
        activity_level: profile.activity_level(),
    }
}

/// Re-syncs one day's snapshot to the profile's current targets. Writes the
/// resolved effective targets (custom overrides when switched on), not the
/// auto-calculated values.
#[instrument(skip(state))]
pub async fn update_day_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> AppResult<Json<DayTargetsUpdated>> {
    let day = parse_date(&date)?;
    let profile = repo::find(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;
    let targets = services::resolve_targets(Some(&profile));
    let updated =
        daily_logs_repo::update_targets_for_date(&state.db, user_id, day, &targets).await?;
    info!(%user_id, %date, updated, "day targets re-synced");
    Ok(Json(DayTargetsUpdated {
        message: "Targets updated successfully",
        date,
        updated,
    }))
}
