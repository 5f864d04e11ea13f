use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VitaminTarget {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub nutrient_name: String,
    pub target_amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryMacros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// One day of the history range, built from the log row and its entries.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryDay {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub total_calories: f64,
    pub calorie_goal: i32,
    pub total_water_ml: i32,
    pub exercise_minutes: i32,
    #[sqlx(flatten)]
    pub macros: HistoryMacros,
    pub entry_count: i64,
}
