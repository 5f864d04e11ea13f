use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use time::Date;
use uuid::Uuid;

use super::dto::UpdateDailyLog;
use super::repo_types::DailyLog;
use crate::profile::ResolvedTargets;

const COLUMNS: &str = "id, user_id, date, calorie_goal, protein_target_g, carbs_target_g, \
                       fat_target_g, total_calories, total_water_ml, exercise_minutes, notes, \
                       created_at";

/// Fields a new log starts with besides its target snapshot.
#[derive(Debug, Default)]
pub struct NewDailyLog<'a> {
    pub total_water_ml: i32,
    pub exercise_minutes: i32,
    pub notes: &'a str,
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<DailyLog>> {
    let rows = sqlx::query_as::<_, DailyLog>(&format!(
        "SELECT {COLUMNS} FROM daily_logs WHERE user_id = $1 ORDER BY date DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list daily logs")?;
    Ok(rows)
}

pub async fn find_by_date(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Option<DailyLog>> {
    let row = sqlx::query_as::<_, DailyLog>(&format!(
        "SELECT {COLUMNS} FROM daily_logs WHERE user_id = $1 AND date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(db)
    .await
    .context("find daily log by date")?;
    Ok(row)
}

/// Whether `log_id` exists and belongs to `user_id`.
pub async fn is_owned<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    log_id: Uuid,
) -> anyhow::Result<bool> {
    let owned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM daily_logs WHERE id = $1 AND user_id = $2)",
    )
    .bind(log_id)
    .bind(user_id)
    .fetch_one(ex)
    .await
    .context("check daily log owner")?;
    Ok(owned)
}

/// Inserts a log for `date`; `None` when the user already has one.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    targets: &ResolvedTargets,
    fields: &NewDailyLog<'_>,
) -> anyhow::Result<Option<DailyLog>> {
    let row = sqlx::query_as::<_, DailyLog>(&format!(
        r#"
        INSERT INTO daily_logs
            (user_id, date, calorie_goal, protein_target_g, carbs_target_g, fat_target_g,
             total_water_ml, exercise_minutes, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id, date) DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .bind(targets.calorie_goal)
    .bind(targets.protein_target_g)
    .bind(targets.carbs_target_g)
    .bind(targets.fat_target_g)
    .bind(fields.total_water_ml)
    .bind(fields.exercise_minutes)
    .bind(fields.notes)
    .fetch_optional(db)
    .await
    .context("insert daily log")?;
    Ok(row)
}

/// Partial update; fields left as `None` keep their stored value.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    log_id: Uuid,
    patch: &UpdateDailyLog,
) -> anyhow::Result<Option<DailyLog>> {
    let row = sqlx::query_as::<_, DailyLog>(&format!(
        r#"
        UPDATE daily_logs
           SET total_water_ml = COALESCE($3, total_water_ml),
               exercise_minutes = COALESCE($4, exercise_minutes),
               notes = COALESCE($5, notes)
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(log_id)
    .bind(user_id)
    .bind(patch.total_water_ml)
    .bind(patch.exercise_minutes)
    .bind(patch.notes.as_deref())
    .fetch_optional(db)
    .await
    .context("update daily log")?;
    Ok(row)
}

pub async fn delete_owned(db: &PgPool, user_id: Uuid, log_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM daily_logs WHERE id = $1 AND user_id = $2")
        .bind(log_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete daily log")?;
    Ok(res.rows_affected() > 0)
}

/// Overwrites the target snapshot of the user's log for `date`, if one exists.
pub async fn update_targets_for_date<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    date: Date,
    targets: &ResolvedTargets,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE daily_logs
           SET calorie_goal = $3, protein_target_g = $4, carbs_target_g = $5, fat_target_g = $6
         WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(targets.calorie_goal)
    .bind(targets.protein_target_g)
    .bind(targets.carbs_target_g)
    .bind(targets.fat_target_g)
    .execute(ex)
    .await
    .context("update day targets")?;
    Ok(res.rows_affected() > 0)
}
