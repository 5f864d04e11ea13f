use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseFields {
    pub exercise_type: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub calories_burned: f64,
    #[serde(default)]
    pub notes: String,
}

impl ExerciseFields {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.exercise_type.trim().is_empty() {
            return Err(AppError::Validation("exercise_type is required".into()));
        }
        if self.duration_minutes < 0 {
            return Err(AppError::Validation(
                "duration_minutes must be non-negative".into(),
            ));
        }
        if self.calories_burned < 0.0 {
            return Err(AppError::Validation(
                "calories_burned must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub daily_log_id: Uuid,
    #[serde(flatten)]
    pub fields: ExerciseFields,
}

#[derive(Debug, Deserialize)]
pub struct ExercisesQuery {
    pub daily_log_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(json: &str) -> ExerciseFields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn calories_and_notes_are_optional() {
        let f = fields(r#"{"exercise_type": "Running", "duration_minutes": 30}"#);
        assert_eq!(f.calories_burned, 0.0);
        assert_eq!(f.notes, "");
        assert!(f.validate().is_ok());
    }

    #[test]
    fn rejects_negative_duration_and_blank_type() {
        assert!(fields(r#"{"exercise_type": "Yoga", "duration_minutes": -5}"#)
            .validate()
            .is_err());
        assert!(fields(r#"{"exercise_type": "  ", "duration_minutes": 5}"#)
            .validate()
            .is_err());
        assert!(fields(r#"{"exercise_type": "Rest", "duration_minutes": 0}"#)
            .validate()
            .is_ok());
    }
}
