use serde::Deserialize;
use uuid::Uuid;

use crate::ai::FoodDescription;
use crate::error::AppError;
use crate::nutrients::Micronutrients;

fn default_serving() -> String {
    "1 serving".into()
}

/// Name, energy and macros shared by create and update bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodFields {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
    pub meal_type: Option<String>,
    #[serde(default = "default_serving")]
    pub serving_size: String,
}

impl FoodFields {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        let amounts = [
            ("calories", self.calories),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fat_g", self.fat_g),
            ("fiber_g", self.fiber_g),
            ("sugar_g", self.sugar_g),
        ];
        if let Some((field, _)) = amounts.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(AppError::Validation(format!("{field} must be a non-negative number")));
        }
        Ok(())
    }

    pub fn description(&self) -> FoodDescription {
        FoodDescription {
            name: self.name.trim().to_string(),
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFoodEntry {
    pub daily_log_id: Uuid,
    #[serde(flatten)]
    pub food: FoodFields,
    pub image_id: Option<Uuid>,
    pub barcode: Option<String>,
    /// When absent (or all zero) the amounts are estimated.
    pub micronutrients: Option<Micronutrients>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFoodEntry {
    #[serde(flatten)]
    pub food: FoodFields,
    /// Replaces the stored detail row when present.
    pub micronutrients: Option<Micronutrients>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub daily_log_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}
fn default_recent_limit() -> i64 { 20 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_defaults() {
        let body: CreateFoodEntry = serde_json::from_str(
            r#"{"daily_log_id": "00000000-0000-0000-0000-000000000000",
                "name": "Apple", "calories": 95}"#,
        )
        .unwrap();
        assert_eq!(body.food.serving_size, "1 serving");
        assert_eq!(body.food.fiber_g, 0.0);
        assert!(body.micronutrients.is_none());
        assert!(body.food.validate().is_ok());
    }

    #[test]
    fn rejects_blank_names_and_negative_amounts() {
        let mut f: FoodFields =
            serde_json::from_str(r#"{"name": "  ", "calories": 10}"#).unwrap();
        assert!(f.validate().is_err());
        f.name = "Rice".into();
        f.fat_g = -1.0;
        let err = f.validate().unwrap_err();
        assert!(err.to_string().contains("fat_g"));
    }
}
