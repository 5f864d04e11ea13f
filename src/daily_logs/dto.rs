use serde::Deserialize;
use time::Date;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateDailyLog {
    #[serde(deserialize_with = "crate::dates::iso_date::option::deserialize")]
    pub date: Option<Date>,
    pub total_water_ml: i32,
    pub exercise_minutes: i32,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDailyLog {
    pub total_water_ml: Option<i32>,
    pub exercise_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_fields_are_optional() {
        let body: CreateDailyLog = serde_json::from_str("{}").unwrap();
        assert!(body.date.is_none());
        assert_eq!(body.total_water_ml, 0);

        let body: CreateDailyLog =
            serde_json::from_str(r#"{"date": "2024-05-01", "notes": "rest day"}"#).unwrap();
        assert_eq!(body.date.map(|d| d.day()), Some(1));
        assert_eq!(body.notes, "rest day");
    }
}
