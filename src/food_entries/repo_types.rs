use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrients::Micronutrients;

/// A logged food with its micronutrient detail row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub daily_log_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub meal_type: Option<String>,
    pub serving_size: String,
    pub image_id: Option<Uuid>,
    pub barcode: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub micronutrients: Micronutrients,
}

/// A previously logged food, most recent use per name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentFood {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub serving_size: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used: OffsetDateTime,
}
