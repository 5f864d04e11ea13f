use tracing::info;
use uuid::Uuid;

use super::dto::{CreateFoodEntry, UpdateFoodEntry};
use super::repo;
use super::repo_types::FoodEntry;
use crate::ai;
use crate::daily_logs::{services::ensure_owned, totals::recalc_daily_totals};
use crate::error::{AppError, AppResult};
use crate::nutrients::Micronutrients;
use crate::state::AppState;

/// Micronutrients sent by the client win; otherwise ask the advisor,
/// falling back to zeros. An empty or all-zero object counts as missing,
/// so `"micronutrients": {}` is estimated rather than stored as zeros.
pub async fn micronutrients_for(st: &AppState, req: &CreateFoodEntry) -> Micronutrients {
    match &req.micronutrients {
        Some(m) if !m.is_zero() => m.clone(),
        _ => ai::food_micros_or_zero(st.advisor.as_ref(), &req.food.description()).await,
    }
}

/// Entry, detail row and the day's calorie total land in one transaction.
pub async fn create_entry(st: &AppState, user_id: Uuid, req: CreateFoodEntry) -> AppResult<FoodEntry> {
    req.food.validate()?;
    ensure_owned(st, user_id, req.daily_log_id).await?;
    let micros = micronutrients_for(st, &req).await;

    let mut tx = st.db.begin().await?;
    let entry_id = repo::insert(&mut tx, &req).await?;
    repo::upsert_micronutrients(&mut tx, entry_id, &micros).await?;
    let total = recalc_daily_totals(&mut tx, req.daily_log_id).await?;
    let entry = repo::fetch(&mut *tx, entry_id).await?;
    tx.commit().await?;

    info!(%user_id, %entry_id, log_id = %req.daily_log_id, total_calories = total, "food entry created");
    Ok(entry)
}

pub async fn update_entry(
    st: &AppState,
    user_id: Uuid,
    entry_id: Uuid,
    req: UpdateFoodEntry,
) -> AppResult<FoodEntry> {
    req.food.validate()?;
    let mut tx = st.db.begin().await?;
    let existing = repo::find_owned(&mut *tx, user_id, entry_id)
        .await?
        .ok_or(AppError::NotFound("Food entry"))?;

    repo::update(&mut tx, entry_id, &req.food).await?;
    if let Some(m) = &req.micronutrients {
        repo::upsert_micronutrients(&mut tx, entry_id, m).await?;
    }
    recalc_daily_totals(&mut tx, existing.daily_log_id).await?;
    let entry = repo::fetch(&mut *tx, entry_id).await?;
    tx.commit().await?;

    info!(%user_id, %entry_id, "food entry updated");
    Ok(entry)
}

pub async fn delete_entry(st: &AppState, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
    let mut tx = st.db.begin().await?;
    let existing = repo::find_owned(&mut *tx, user_id, entry_id)
        .await?
        .ok_or(AppError::NotFound("Food entry"))?;
    repo::delete(&mut tx, entry_id).await?;
    recalc_daily_totals(&mut tx, existing.daily_log_id).await?;
    tx.commit().await?;

    info!(%user_id, %entry_id, log_id = %existing.daily_log_id, "food entry deleted");
    Ok(())
}
