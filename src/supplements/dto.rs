use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

fn default_kind() -> String {
    "supplement".into()
}

/// Descriptive fields shared by create and update bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplementFields {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub time_taken: String,
    #[serde(default)]
    pub notes: String,
}

impl SupplementFields {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSupplement {
    pub daily_log_id: Uuid,
    #[serde(flatten)]
    pub fields: SupplementFields,
}

#[derive(Debug, Deserialize)]
pub struct SupplementsQuery {
    pub daily_log_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_defaults_to_supplement() {
        let body: CreateSupplement = serde_json::from_str(
            r#"{"daily_log_id": "00000000-0000-0000-0000-000000000000", "name": "Iron", "dosage": "18 mg"}"#,
        )
        .unwrap();
        assert_eq!(body.fields.kind, "supplement");
        assert_eq!(body.fields.dosage, "18 mg");
        assert!(body.fields.validate().is_ok());

        let f: SupplementFields = serde_json::from_str(r#"{"name": "", "type": "medication"}"#).unwrap();
        assert_eq!(f.kind, "medication");
        assert!(f.validate().is_err());
    }
}
