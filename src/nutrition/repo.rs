use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::{HistoryDay, VitaminTarget};

const TARGET_COLUMNS: &str = "id, user_id, nutrient_name, target_amount, unit";

pub async fn list_targets(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<VitaminTarget>> {
    let rows = sqlx::query_as::<_, VitaminTarget>(&format!(
        "SELECT {TARGET_COLUMNS} FROM vitamin_targets WHERE user_id = $1 ORDER BY nutrient_name"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list vitamin targets")?;
    Ok(rows)
}

/// Insert or replace the user's target for `name`.
pub async fn upsert_target<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    name: &str,
    amount: f64,
    unit: &str,
) -> anyhow::Result<VitaminTarget> {
    let row = sqlx::query_as::<_, VitaminTarget>(&format!(
        r#"
        INSERT INTO vitamin_targets (user_id, nutrient_name, target_amount, unit)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, nutrient_name)
        DO UPDATE SET target_amount = EXCLUDED.target_amount, unit = EXCLUDED.unit
        RETURNING {TARGET_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(name)
    .bind(amount)
    .bind(unit)
    .fetch_one(ex)
    .await
    .with_context(|| format!("upsert vitamin target {name}"))?;
    Ok(row)
}

pub async fn delete_target_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM vitamin_targets WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete vitamin target")?;
    Ok(res.rows_affected() > 0)
}

/// Per-day totals for every log in `[start, end]`, oldest first.
pub async fn history(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> anyhow::Result<Vec<HistoryDay>> {
    let rows = sqlx::query_as::<_, HistoryDay>(
        r#"
        SELECT d.date,
               d.total_calories,
               COALESCE(d.calorie_goal, 2000)         AS calorie_goal,
               d.total_water_ml,
               d.exercise_minutes,
               COALESCE(SUM(f.protein_g), 0)::float8 AS protein_g,
               COALESCE(SUM(f.carbs_g), 0)::float8   AS carbs_g,
               COALESCE(SUM(f.fat_g), 0)::float8     AS fat_g,
               COALESCE(SUM(f.fiber_g), 0)::float8   AS fiber_g,
               COUNT(f.id)                           AS entry_count
          FROM daily_logs d
          LEFT JOIN food_entries f ON f.daily_log_id = d.id
         WHERE d.user_id = $1 AND d.date BETWEEN $2 AND $3
         GROUP BY d.id
         ORDER BY d.date
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("nutrition history")?;
    Ok(rows)
}
