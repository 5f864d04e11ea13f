use anyhow::Context;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use super::dto::ExerciseFields;
use super::repo_types::Exercise;

const COLUMNS: &str =
    "x.id, x.daily_log_id, x.exercise_type, x.duration_minutes, x.calories_burned, x.notes, x.created_at";

pub async fn list_by_log<'e>(ex: impl PgExecutor<'e>, log_id: Uuid) -> anyhow::Result<Vec<Exercise>> {
    let rows = sqlx::query_as::<_, Exercise>(&format!(
        "SELECT {COLUMNS} FROM exercises x WHERE x.daily_log_id = $1 ORDER BY x.created_at, x.id"
    ))
    .bind(log_id)
    .fetch_all(ex)
    .await
    .context("list exercises")?;
    Ok(rows)
}

pub async fn find_owned<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<Exercise>> {
    let row = sqlx::query_as::<_, Exercise>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM exercises x
          JOIN daily_logs d ON d.id = x.daily_log_id
         WHERE x.id = $1 AND d.user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
    .context("find exercise")?;
    Ok(row)
}

pub async fn insert(
    conn: &mut PgConnection,
    log_id: Uuid,
    f: &ExerciseFields,
) -> anyhow::Result<Exercise> {
    let row = sqlx::query_as::<_, Exercise>(&format!(
        r#"
        INSERT INTO exercises AS x (daily_log_id, exercise_type, duration_minutes, calories_burned, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(log_id)
    .bind(f.exercise_type.trim())
    .bind(f.duration_minutes)
    .bind(f.calories_burned)
    .bind(&f.notes)
    .fetch_one(conn)
    .await
    .context("insert exercise")?;
    Ok(row)
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    f: &ExerciseFields,
) -> anyhow::Result<Exercise> {
    let row = sqlx::query_as::<_, Exercise>(&format!(
        r#"
        UPDATE exercises AS x
           SET exercise_type = $2, duration_minutes = $3, calories_burned = $4, notes = $5
         WHERE x.id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(f.exercise_type.trim())
    .bind(f.duration_minutes)
    .bind(f.calories_burned)
    .bind(&f.notes)
    .fetch_one(conn)
    .await
    .context("update exercise")?;
    Ok(row)
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM exercises WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .context("delete exercise")?;
    Ok(())
}
