use anyhow::Context;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use super::dto::{CreateFoodEntry, FoodFields};
use super::repo_types::{FoodEntry, RecentFood};
use crate::nutrients::Micronutrients;

/// Entry columns plus the detail row, zeros when the row is missing.
const SELECT_ENTRY: &str = r#"
    SELECT f.id, f.daily_log_id, f.name, f.calories, f.protein_g, f.carbs_g, f.fat_g,
           f.fiber_g, f.sugar_g, f.meal_type, f.serving_size, f.image_id, f.barcode,
           f.created_at,
           COALESCE(m.vitamin_a_mcg, 0)   AS vitamin_a_mcg,
           COALESCE(m.vitamin_c_mg, 0)    AS vitamin_c_mg,
           COALESCE(m.vitamin_d_mcg, 0)   AS vitamin_d_mcg,
           COALESCE(m.vitamin_e_mg, 0)    AS vitamin_e_mg,
           COALESCE(m.vitamin_k_mcg, 0)   AS vitamin_k_mcg,
           COALESCE(m.vitamin_b6_mg, 0)   AS vitamin_b6_mg,
           COALESCE(m.vitamin_b12_mcg, 0) AS vitamin_b12_mcg,
           COALESCE(m.folate_mcg, 0)      AS folate_mcg,
           COALESCE(m.calcium_mg, 0)      AS calcium_mg,
           COALESCE(m.iron_mg, 0)         AS iron_mg,
           COALESCE(m.magnesium_mg, 0)    AS magnesium_mg,
           COALESCE(m.potassium_mg, 0)    AS potassium_mg,
           COALESCE(m.zinc_mg, 0)         AS zinc_mg,
           COALESCE(m.sodium_mg, 0)       AS sodium_mg
      FROM food_entries f
      LEFT JOIN micronutrients m ON m.food_entry_id = f.id
"#;

/// In creation order.
pub async fn list_by_log<'e>(
    ex: impl PgExecutor<'e>,
    log_id: Uuid,
) -> anyhow::Result<Vec<FoodEntry>> {
    let rows = sqlx::query_as::<_, FoodEntry>(&format!(
        "{SELECT_ENTRY} WHERE f.daily_log_id = $1 ORDER BY f.created_at, f.id"
    ))
    .bind(log_id)
    .fetch_all(ex)
    .await
    .context("list food entries")?;
    Ok(rows)
}

pub async fn fetch<'e>(ex: impl PgExecutor<'e>, entry_id: Uuid) -> anyhow::Result<FoodEntry> {
    let row = sqlx::query_as::<_, FoodEntry>(&format!("{SELECT_ENTRY} WHERE f.id = $1"))
        .bind(entry_id)
        .fetch_one(ex)
        .await
        .context("fetch food entry")?;
    Ok(row)
}

/// The entry, if its daily log belongs to `user_id`.
pub async fn find_owned<'e>(
    ex: impl PgExecutor<'e>,
    user_id: Uuid,
    entry_id: Uuid,
) -> anyhow::Result<Option<FoodEntry>> {
    let row = sqlx::query_as::<_, FoodEntry>(&format!(
        r#"{SELECT_ENTRY}
          JOIN daily_logs d ON d.id = f.daily_log_id
         WHERE f.id = $1 AND d.user_id = $2"#
    ))
    .bind(entry_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
    .context("find food entry")?;
    Ok(row)
}

pub async fn insert(conn: &mut PgConnection, req: &CreateFoodEntry) -> anyhow::Result<Uuid> {
    let f = &req.food;
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO food_entries
            (daily_log_id, name, calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g,
             meal_type, serving_size, image_id, barcode)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(req.daily_log_id)
    .bind(f.name.trim())
    .bind(f.calories)
    .bind(f.protein_g)
    .bind(f.carbs_g)
    .bind(f.fat_g)
    .bind(f.fiber_g)
    .bind(f.sugar_g)
    .bind(f.meal_type.as_deref())
    .bind(&f.serving_size)
    .bind(req.image_id)
    .bind(req.barcode.as_deref())
    .fetch_one(conn)
    .await
    .context("insert food entry")?;
    Ok(id)
}

/// Inserts or replaces the entry's detail row.
pub async fn upsert_micronutrients(
    conn: &mut PgConnection,
    entry_id: Uuid,
    m: &Micronutrients,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO micronutrients
            (food_entry_id, vitamin_a_mcg, vitamin_c_mg, vitamin_d_mcg, vitamin_e_mg,
             vitamin_k_mcg, vitamin_b6_mg, vitamin_b12_mcg, folate_mcg, calcium_mg,
             iron_mg, magnesium_mg, potassium_mg, zinc_mg, sodium_mg)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (food_entry_id) DO UPDATE SET
            vitamin_a_mcg = EXCLUDED.vitamin_a_mcg,
            vitamin_c_mg = EXCLUDED.vitamin_c_mg,
            vitamin_d_mcg = EXCLUDED.vitamin_d_mcg,
            vitamin_e_mg = EXCLUDED.vitamin_e_mg,
            vitamin_k_mcg = EXCLUDED.vitamin_k_mcg,
            vitamin_b6_mg = EXCLUDED.vitamin_b6_mg,
            vitamin_b12_mcg = EXCLUDED.vitamin_b12_mcg,
            folate_mcg = EXCLUDED.folate_mcg,
            calcium_mg = EXCLUDED.calcium_mg,
            iron_mg = EXCLUDED.iron_mg,
            magnesium_mg = EXCLUDED.magnesium_mg,
            potassium_mg = EXCLUDED.potassium_mg,
            zinc_mg = EXCLUDED.zinc_mg,
            sodium_mg = EXCLUDED.sodium_mg
        "#,
    )
    .bind(entry_id)
    .bind(m.vitamin_a_mcg)
    .bind(m.vitamin_c_mg)
    .bind(m.vitamin_d_mcg)
    .bind(m.vitamin_e_mg)
    .bind(m.vitamin_k_mcg)
    .bind(m.vitamin_b6_mg)
    .bind(m.vitamin_b12_mcg)
    .bind(m.folate_mcg)
    .bind(m.calcium_mg)
    .bind(m.iron_mg)
    .bind(m.magnesium_mg)
    .bind(m.potassium_mg)
    .bind(m.zinc_mg)
    .bind(m.sodium_mg)
    .execute(conn)
    .await
    .context("store micronutrients")?;
    Ok(())
}

pub async fn update(
    conn: &mut PgConnection,
    entry_id: Uuid,
    f: &FoodFields,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE food_entries
           SET name = $2, calories = $3, protein_g = $4, carbs_g = $5, fat_g = $6,
               fiber_g = $7, sugar_g = $8, meal_type = $9, serving_size = $10
         WHERE id = $1
        "#,
    )
    .bind(entry_id)
    .bind(f.name.trim())
    .bind(f.calories)
    .bind(f.protein_g)
    .bind(f.carbs_g)
    .bind(f.fat_g)
    .bind(f.fiber_g)
    .bind(f.sugar_g)
    .bind(f.meal_type.as_deref())
    .bind(&f.serving_size)
    .execute(conn)
    .await
    .context("update food entry")?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, entry_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM food_entries WHERE id = $1")
        .bind(entry_id)
        .execute(conn)
        .await
        .context("delete food entry")?;
    Ok(())
}

/// Distinct foods (case-insensitive by name) across all of the user's logs,
/// most recently used first.
pub async fn recent(db: &PgPool, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<RecentFood>> {
    let rows = sqlx::query_as::<_, RecentFood>(
        r#"
        SELECT name, calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g, serving_size, last_used
          FROM (
            SELECT DISTINCT ON (LOWER(f.name))
                   f.name, f.calories, f.protein_g, f.carbs_g, f.fat_g, f.fiber_g, f.sugar_g,
                   f.serving_size, f.created_at AS last_used
              FROM food_entries f
              JOIN daily_logs d ON d.id = f.daily_log_id
             WHERE d.user_id = $1
             ORDER BY LOWER(f.name), f.created_at DESC
          ) latest
         ORDER BY last_used DESC
         LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("recent foods")?;
    Ok(rows)
}
