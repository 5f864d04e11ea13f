//! Denormalized day totals. Both are recomputed from every child row on
//! each mutation, never adjusted by deltas, so a bad intermediate state
//! heals on the next write. Call inside the mutation's transaction.

use anyhow::Context;
use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

pub fn sum_calories(calories: &[f64]) -> f64 {
    calories.iter().sum()
}

pub fn sum_minutes(minutes: &[i32]) -> i32 {
    minutes.iter().sum()
}

pub async fn recalc_daily_totals(conn: &mut PgConnection, log_id: Uuid) -> anyhow::Result<f64> {
    let calories =
        sqlx::query_scalar::<_, f64>("SELECT calories FROM food_entries WHERE daily_log_id = $1")
            .bind(log_id)
            .fetch_all(&mut *conn)
            .await
            .context("load entry calories")?;
    let total = sum_calories(&calories);

    sqlx::query("UPDATE daily_logs SET total_calories = $1 WHERE id = $2")
        .bind(total)
        .bind(log_id)
        .execute(&mut *conn)
        .await
        .context("store total calories")?;
    debug!(%log_id, total, entries = calories.len(), "daily calories recalculated");
    Ok(total)
}

pub async fn recalc_exercise_totals(
    conn: &mut PgConnection,
    log_id: Uuid,
) -> anyhow::Result<i32> {
    let minutes = sqlx::query_scalar::<_, i32>(
        "SELECT duration_minutes FROM exercises WHERE daily_log_id = $1",
    )
    .bind(log_id)
    .fetch_all(&mut *conn)
    .await
    .context("load exercise minutes")?;
    let total = sum_minutes(&minutes);

    sqlx::query("UPDATE daily_logs SET exercise_minutes = $1 WHERE id = $2")
        .bind(total)
        .bind(log_id)
        .execute(&mut *conn)
        .await
        .context("store exercise minutes")?;
    debug!(%log_id, total, exercises = minutes.len(), "exercise minutes recalculated");
    Ok(total)
}
