use serde::{Deserialize, Serialize};

use crate::calculations::{ActivityLevel, BodyMetrics, Gender, Goal};
use crate::error::AppError;

/// Body for both POST and PUT /profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub use_custom_targets: bool,
    pub custom_calorie_goal: Option<i32>,
    pub custom_protein_target_g: Option<i32>,
    pub custom_carbs_target_g: Option<i32>,
    pub custom_fat_target_g: Option<i32>,
    pub custom_water_target_ml: Option<i32>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=130).contains(&self.age) {
            return Err(AppError::Validation("age must be between 1 and 130".into()));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(AppError::Validation("weight_kg must be positive".into()));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(AppError::Validation("height_cm must be positive".into()));
        }
        let customs = [
            self.custom_calorie_goal,
            self.custom_protein_target_g,
            self.custom_carbs_target_g,
            self.custom_fat_target_g,
            self.custom_water_target_ml,
        ];
        if customs.iter().flatten().any(|v| *v < 0) {
            return Err(AppError::Validation("custom targets cannot be negative".into()));
        }
        Ok(())
    }

    pub fn metrics(&self) -> BodyMetrics {
        BodyMetrics {
            age: self.age,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            gender: self.gender,
            activity_level: self.activity_level,
            goal: self.goal,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CalculationsResponse {
    pub bmr: i32,
    pub tdee: i32,
    pub calorie_goal: i32,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Serialize)]
pub struct DayTargetsUpdated {
    pub message: &'static str,
    pub date: String,
    pub updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> ProfileRequest {
        serde_json::from_str(
            r#"{"age": 30, "weight_kg": 70, "height_cm": 175, "gender": "male",
                "activity_level": "moderately_active", "goal": "lose"}"#,
        )
        .unwrap()
    }

    #[test]
    fn custom_fields_default_to_off() {
        let b = body();
        assert!(!b.use_custom_targets);
        assert!(b.custom_calorie_goal.is_none());
        assert!(b.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_metrics() {
        let mut b = body();
        b.weight_kg = 0.0;
        assert!(matches!(b.validate(), Err(AppError::Validation(_))));
        let mut b = body();
        b.custom_fat_target_g = Some(-5);
        assert!(b.validate().is_err());
    }

    #[test]
    fn unknown_enum_values_are_rejected_in_requests() {
        let res = serde_json::from_str::<ProfileRequest>(
            r#"{"age": 30, "weight_kg": 70, "height_cm": 175, "gender": "male",
                "activity_level": "couch", "goal": "lose"}"#,
        );
        assert!(res.is_err());
    }
}
