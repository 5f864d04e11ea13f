use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::calculations::{ActivityLevel, Gender, Goal};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    pub bmr: f64,
    pub tdee: f64,
    pub protein_target_g: i32,
    pub carbs_target_g: i32,
    pub fat_target_g: i32,
    pub water_target_ml: i32,
    pub use_custom_targets: bool,
    pub custom_calorie_goal: Option<i32>,
    pub custom_protein_target_g: Option<i32>,
    pub custom_carbs_target_g: Option<i32>,
    pub custom_fat_target_g: Option<i32>,
    pub custom_water_target_ml: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserProfile {
    pub fn gender(&self) -> Gender {
        Gender::from_stored(&self.gender)
    }

    pub fn activity_level(&self) -> ActivityLevel {
        ActivityLevel::from_stored(&self.activity_level)
    }

    pub fn goal(&self) -> Goal {
        Goal::from_stored(&self.goal)
    }
}
