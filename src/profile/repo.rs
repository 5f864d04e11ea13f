use anyhow::Context;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use super::dto::ProfileRequest;
use super::repo_types::UserProfile;
use crate::calculations::DerivedTargets;

const COLUMNS: &str = "user_id, age, weight_kg, height_cm, gender, activity_level, goal, bmr, \
                       tdee, protein_target_g, carbs_target_g, fat_target_g, water_target_ml, \
                       use_custom_targets, custom_calorie_goal, custom_protein_target_g, \
                       custom_carbs_target_g, custom_fat_target_g, custom_water_target_ml, \
                       created_at, updated_at";

pub async fn find<'e>(ex: impl PgExecutor<'e>, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(ex)
    .await
    .context("find profile")?;
    Ok(row)
}

/// Locks the row for the rest of the transaction.
pub async fn find_for_update(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("lock profile")?;
    Ok(row)
}

/// Writes the metrics together with every derived field.
pub async fn upsert(
    conn: &mut PgConnection,
    user_id: Uuid,
    req: &ProfileRequest,
    derived: &DerivedTargets,
) -> anyhow::Result<UserProfile> {
    let row = sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        INSERT INTO user_profiles
            (user_id, age, weight_kg, height_cm, gender, activity_level, goal, bmr, tdee,
             protein_target_g, carbs_target_g, fat_target_g, water_target_ml,
             use_custom_targets, custom_calorie_goal, custom_protein_target_g,
             custom_carbs_target_g, custom_fat_target_g, custom_water_target_ml)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        ON CONFLICT (user_id) DO UPDATE SET
            age = EXCLUDED.age,
            weight_kg = EXCLUDED.weight_kg,
            height_cm = EXCLUDED.height_cm,
            gender = EXCLUDED.gender,
            activity_level = EXCLUDED.activity_level,
            goal = EXCLUDED.goal,
            bmr = EXCLUDED.bmr,
            tdee = EXCLUDED.tdee,
            protein_target_g = EXCLUDED.protein_target_g,
            carbs_target_g = EXCLUDED.carbs_target_g,
            fat_target_g = EXCLUDED.fat_target_g,
            water_target_ml = EXCLUDED.water_target_ml,
            use_custom_targets = EXCLUDED.use_custom_targets,
            custom_calorie_goal = EXCLUDED.custom_calorie_goal,
            custom_protein_target_g = EXCLUDED.custom_protein_target_g,
            custom_carbs_target_g = EXCLUDED.custom_carbs_target_g,
            custom_fat_target_g = EXCLUDED.custom_fat_target_g,
            custom_water_target_ml = EXCLUDED.custom_water_target_ml,
            updated_at = now()
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(req.age)
    .bind(req.weight_kg)
    .bind(req.height_cm)
    .bind(req.gender.as_str())
    .bind(req.activity_level.as_str())
    .bind(req.goal.as_str())
    .bind(derived.bmr)
    .bind(derived.tdee)
    .bind(derived.macros.protein_g)
    .bind(derived.macros.carbs_g)
    .bind(derived.macros.fat_g)
    .bind(derived.water_target_ml)
    .bind(req.use_custom_targets)
    .bind(req.custom_calorie_goal)
    .bind(req.custom_protein_target_g)
    .bind(req.custom_carbs_target_g)
    .bind(req.custom_fat_target_g)
    .bind(req.custom_water_target_ml)
    .fetch_one(conn)
    .await
    .context("upsert profile")?;
    Ok(row)
}
