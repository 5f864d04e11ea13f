use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use super::dto::{
    AnalyzeImageRequest, AnalyzeImageResponse, ChatRequest, ChatSuggestion, FoodAnalysis,
    GoalPreview, GoalPreviewRequest,
};
use crate::auth::AuthUser;
use crate::calculations::{self, round_whole};
use crate::error::{AppError, AppResult};
use crate::images::{repo as images_repo, services as images};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ai/analyze-image", post(analyze_image))
        .route("/ai/calculate-goals", post(calculate_goals))
        .route("/chat", post(chat))
}

/// Analyzes a stored photo together with the rest of its upload group.
/// A previous result is returned as-is unless `force_reanalyze` is set.
#[instrument(skip(state, req), fields(image_id = %req.image_id))]
pub async fn analyze_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<AnalyzeImageRequest>,
) -> AppResult<Json<AnalyzeImageResponse>> {
    let image = images_repo::find_owned(&state.db, user_id, req.image_id)
        .await?
        .ok_or(AppError::NotFound("Image"))?;

    if image.analyzed && !req.force_reanalyze {
        if let Some(cached) = image.analysis_result.clone() {
            match serde_json::from_value::<FoodAnalysis>(cached) {
                Ok(analysis) => {
                    return Ok(Json(AnalyzeImageResponse {
                        analysis,
                        is_cached: true,
                        images_analyzed: None,
                    }))
                }
                Err(e) => warn!(error = %e, "stored analysis unreadable, analyzing again"),
            }
        }
    }

    let extras = images_repo::list_group_extras(&state.db, &image).await?;
    let inputs = images::load_for_analysis(&state, &image, &extras).await?;
    let analysis = state.advisor.analyze_food(&inputs, &req.notes).await?;

    let stored = serde_json::to_value(&analysis).map_err(anyhow::Error::from)?;
    images_repo::save_analysis(&state.db, &image, &stored).await?;
    info!(%user_id, items = analysis.items.len(), images = inputs.len(), "image analyzed");

    Ok(Json(AnalyzeImageResponse {
        analysis,
        is_cached: false,
        images_analyzed: Some(inputs.len()),
    }))
}

/// Stateless preview of the energy targets for a set of body metrics.
#[instrument(skip(req))]
pub async fn calculate_goals(
    AuthUser(_user_id): AuthUser,
    Json(req): Json<GoalPreviewRequest>,
) -> AppResult<Json<GoalPreview>> {
    Ok(Json(goal_preview(&req)))
}

fn goal_preview(req: &GoalPreviewRequest) -> GoalPreview {
    let bmr = calculations::bmr(req.weight_kg, req.height_cm, req.age, req.gender);
    let tdee = calculations::tdee(bmr, req.activity_level);
    let goal_kcal = calculations::calorie_goal(tdee, req.goal);
    GoalPreview {
        bmr: round_whole(bmr),
        tdee: round_whole(tdee),
        calorie_goal: round_whole(goal_kcal),
        goal: req.goal,
    }
}

#[instrument(skip(state, req), fields(history = req.history.len()))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatSuggestion>> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".into()));
    }
    let suggestion = state
        .advisor
        .chat_suggest(&req.message, &req.history, &req.context)
        .await?;
    Ok(Json(suggestion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{ActivityLevel, Gender, Goal};

    #[test]
    fn goal_preview_rounds_each_value() {
        let req = GoalPreviewRequest {
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::Lose,
        };
        assert_eq!(
            goal_preview(&req),
            GoalPreview {
                bmr: 1649,
                tdee: 2556,
                calorie_goal: 2056,
                goal: Goal::Lose,
            }
        );
    }
}
