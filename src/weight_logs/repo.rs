use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::WeightLog;

const COLUMNS: &str = "id, user_id, date, weight_kg, notes, created_at";

/// Oldest first; `range` bounds are inclusive.
pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    range: Option<(Date, Date)>,
) -> anyhow::Result<Vec<WeightLog>> {
    let (start, end) = range.unzip();
    let rows = sqlx::query_as::<_, WeightLog>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM weight_logs
         WHERE user_id = $1
           AND ($2::date IS NULL OR date BETWEEN $2 AND $3)
         ORDER BY date ASC
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("list weight logs")?;
    Ok(rows)
}

pub async fn latest(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<WeightLog>> {
    let row = sqlx::query_as::<_, WeightLog>(&format!(
        "SELECT {COLUMNS} FROM weight_logs WHERE user_id = $1 ORDER BY date DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("latest weight log")?;
    Ok(row)
}

/// One row per date: a second weigh-in on the same day replaces the first.
pub async fn upsert<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    date: Date,
    weight_kg: f64,
    notes: &str,
) -> anyhow::Result<WeightLog> {
    let row = sqlx::query_as::<_, WeightLog>(&format!(
        r#"
        INSERT INTO weight_logs (user_id, date, weight_kg, notes)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, date)
        DO UPDATE SET weight_kg = EXCLUDED.weight_kg, notes = EXCLUDED.notes
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .bind(weight_kg)
    .bind(notes)
    .fetch_one(ex)
    .await
    .context("upsert weight log")?;
    Ok(row)
}

pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM weight_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete weight log")?;
    Ok(res.rows_affected() > 0)
}
