use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One user's record for one calendar date. The four target columns are a
/// snapshot taken when the log was created (or last re-synced).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub calorie_goal: i32,
    pub protein_target_g: i32,
    pub carbs_target_g: i32,
    pub fat_target_g: i32,
    pub total_calories: f64,
    pub total_water_ml: i32,
    pub exercise_minutes: i32,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
