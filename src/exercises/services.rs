use tracing::info;
use uuid::Uuid;

use super::dto::{CreateExercise, ExerciseFields};
use super::repo;
use super::repo_types::Exercise;
use crate::daily_logs::{services::ensure_owned, totals::recalc_exercise_totals};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn create_exercise(
    st: &AppState,
    user_id: Uuid,
    req: CreateExercise,
) -> AppResult<Exercise> {
    req.fields.validate()?;
    ensure_owned(st, user_id, req.daily_log_id).await?;

    let mut tx = st.db.begin().await?;
    let exercise = repo::insert(&mut tx, req.daily_log_id, &req.fields).await?;
    let minutes = recalc_exercise_totals(&mut tx, req.daily_log_id).await?;
    tx.commit().await?;

    info!(%user_id, exercise_id = %exercise.id, exercise_minutes = minutes, "exercise logged");
    Ok(exercise)
}

/// The owning log is read before the write so its total can be refreshed.
pub async fn update_exercise(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    fields: ExerciseFields,
) -> AppResult<Exercise> {
    fields.validate()?;
    let mut tx = st.db.begin().await?;
    let existing = repo::find_owned(&mut *tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Exercise"))?;
    let exercise = repo::update(&mut tx, id, &fields).await?;
    recalc_exercise_totals(&mut tx, existing.daily_log_id).await?;
    tx.commit().await?;

    info!(%user_id, exercise_id = %id, "exercise updated");
    Ok(exercise)
}

pub async fn delete_exercise(st: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let mut tx = st.db.begin().await?;
    let existing = repo::find_owned(&mut *tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Exercise"))?;
    repo::delete(&mut tx, id).await?;
    recalc_exercise_totals(&mut tx, existing.daily_log_id).await?;
    tx.commit().await?;

    info!(%user_id, exercise_id = %id, log_id = %existing.daily_log_id, "exercise deleted");
    Ok(())
}
