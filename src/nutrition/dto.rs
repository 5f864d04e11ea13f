use serde::{Deserialize, Serialize};
use time::Date;

use super::services::NutritionBreakdown;
use crate::daily_logs::DailyLog;
use crate::dates::parse_date;
use crate::error::AppError;
use crate::food_entries::FoodEntry;
use crate::supplements::Supplement;

#[derive(Debug, Serialize)]
pub struct DayNutrition {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub daily_log: DailyLog,
    #[serde(flatten)]
    pub breakdown: NutritionBreakdown,
    pub food_entries: Vec<FoodEntry>,
    pub supplements: Vec<Supplement>,
}

#[derive(Debug, Deserialize)]
pub struct SetVitaminTarget {
    pub nutrient_name: String,
    pub target_amount: f64,
    pub unit: String,
}

impl SetVitaminTarget {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nutrient_name.trim().is_empty() || self.unit.trim().is_empty() {
            return Err(AppError::Validation(
                "nutrient_name and unit are required".into(),
            ));
        }
        if !self.target_amount.is_finite() || self.target_amount < 0.0 {
            return Err(AppError::Validation(
                "target_amount must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl HistoryQuery {
    /// Both bounds, inclusive.
    pub fn range(&self) -> Result<(Date, Date), AppError> {
        let (Some(start), Some(end)) = (&self.start_date, &self.end_date) else {
            return Err(AppError::Validation(
                "start_date and end_date are required".into(),
            ));
        };
        let (start, end) = (parse_date(start)?, parse_date(end)?);
        if start > end {
            return Err(AppError::Validation(
                "start_date must not be after end_date".into(),
            ));
        }
        Ok((start, end))
    }
}
