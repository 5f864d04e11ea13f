use serde::Deserialize;
use time::Date;

use crate::dates::parse_date;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateWeightLog {
    /// Defaults to today.
    #[serde(default, deserialize_with = "crate::dates::iso_date::option::deserialize")]
    pub date: Option<Date>,
    pub weight_kg: f64,
    #[serde(default)]
    pub notes: String,
}

impl CreateWeightLog {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(AppError::Validation("weight_kg must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WeightLogsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WeightLogsQuery {
    /// Inclusive bounds, or `None` for the whole history. Both dates must be
    /// given together.
    pub fn range(&self) -> Result<Option<(Date, Date)>, AppError> {
        match (&self.start_date, &self.end_date) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => {
                let (start, end) = (parse_date(start)?, parse_date(end)?);
                if start > end {
                    return Err(AppError::Validation(
                        "start_date must not be after end_date".into(),
                    ));
                }
                Ok(Some((start, end)))
            }
            _ => Err(AppError::Validation(
                "start_date and end_date must be given together".into(),
            )),
        }
    }
}
