use anyhow::Context;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::dto::{CreateSupplement, SupplementFields};
use super::repo_types::Supplement;
use crate::nutrients::Micronutrients;

const COLUMNS: &str = "s.id, s.daily_log_id, s.name, s.dosage, s.kind, s.time_taken, s.notes, \
                       s.vitamin_a_mcg, s.vitamin_c_mg, s.vitamin_d_mcg, s.calcium_mg, \
                       s.iron_mg, s.potassium_mg, s.sodium_mg, s.created_at";

const RECENT_DAYS: i32 = 30;
const RECENT_LIMIT: i64 = 50;

pub async fn list_by_log<'e>(
    ex: impl PgExecutor<'e>,
    log_id: Uuid,
) -> anyhow::Result<Vec<Supplement>> {
    let rows = sqlx::query_as::<_, Supplement>(&format!(
        "SELECT {COLUMNS} FROM supplements s WHERE s.daily_log_id = $1 ORDER BY s.created_at, s.id"
    ))
    .bind(log_id)
    .fetch_all(ex)
    .await
    .context("list supplements")?;
    Ok(rows)
}

/// Supplements logged on days within the last 30, newest first.
pub async fn recent(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Supplement>> {
    let rows = sqlx::query_as::<_, Supplement>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM supplements s
          JOIN daily_logs d ON d.id = s.daily_log_id
         WHERE d.user_id = $1 AND d.date >= CURRENT_DATE - $2::int
         ORDER BY s.created_at DESC
         LIMIT $3
        "#
    ))
    .bind(user_id)
    .bind(RECENT_DAYS)
    .bind(RECENT_LIMIT)
    .fetch_all(db)
    .await
    .context("recent supplements")?;
    Ok(rows)
}

pub async fn insert(
    db: &PgPool,
    req: &CreateSupplement,
    m: &Micronutrients,
) -> anyhow::Result<Supplement> {
    let f = &req.fields;
    let row = sqlx::query_as::<_, Supplement>(&format!(
        r#"
        INSERT INTO supplements AS s
            (daily_log_id, name, dosage, kind, time_taken, notes,
             vitamin_a_mcg, vitamin_c_mg, vitamin_d_mcg, calcium_mg, iron_mg, potassium_mg, sodium_mg)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(req.daily_log_id)
    .bind(f.name.trim())
    .bind(&f.dosage)
    .bind(&f.kind)
    .bind(&f.time_taken)
    .bind(&f.notes)
    .bind(m.vitamin_a_mcg)
    .bind(m.vitamin_c_mg)
    .bind(m.vitamin_d_mcg)
    .bind(m.calcium_mg)
    .bind(m.iron_mg)
    .bind(m.potassium_mg)
    .bind(m.sodium_mg)
    .fetch_one(db)
    .await
    .context("insert supplement")?;
    Ok(row)
}

/// Updates the descriptive fields; the estimated amounts are kept.
pub async fn update_owned(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    f: &SupplementFields,
) -> anyhow::Result<Option<Supplement>> {
    let row = sqlx::query_as::<_, Supplement>(&format!(
        r#"
        UPDATE supplements AS s
           SET name = $3, dosage = $4, kind = $5, time_taken = $6, notes = $7
          FROM daily_logs d
         WHERE s.id = $1 AND d.id = s.daily_log_id AND d.user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(f.name.trim())
    .bind(&f.dosage)
    .bind(&f.kind)
    .bind(&f.time_taken)
    .bind(&f.notes)
    .fetch_optional(db)
    .await
    .context("update supplement")?;
    Ok(row)
}

pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        DELETE FROM supplements s
         USING daily_logs d
         WHERE s.id = $1 AND d.id = s.daily_log_id AND d.user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await
    .context("delete supplement")?;
    Ok(res.rows_affected() > 0)
}
