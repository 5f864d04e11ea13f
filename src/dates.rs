use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::AppError;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` path segment or query value.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, ISO_DATE)
        .map_err(|_| AppError::Validation(format!("invalid date {raw:?}, expected YYYY-MM-DD")))
}

/// `#[serde(with = "crate::dates::iso_date")]` for `YYYY-MM-DD` fields.
pub mod iso_date {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::ISO_DATE;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        Date::parse(&raw, ISO_DATE).map_err(de::Error::custom)
    }

    /// `#[serde(deserialize_with = "crate::dates::iso_date::option::deserialize")]`
    /// for optional request fields.
    pub mod option {
        use serde::{Deserialize, Deserializer};
        use time::Date;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapped(#[serde(with = "super")] Date);
            Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(date)| date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parses_iso_dates() {
        let d = parse_date("2024-02-29").unwrap();
        assert_eq!(d.year(), 2024);
        assert_eq!(d.month(), Month::February);
        assert_eq!(d.day(), 29);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_date("29/02/2024"), Err(AppError::Validation(_))));
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn serde_helpers_use_the_wire_format() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Row {
            #[serde(with = "iso_date")]
            date: Date,
        }
        let row: Row = serde_json::from_str(r#"{"date":"2025-01-07"}"#).unwrap();
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"date":"2025-01-07"}"#);
    }

    #[test]
    fn optional_dates_accept_null_and_missing() {
        #[derive(serde::Deserialize)]
        struct Query {
            #[serde(default, deserialize_with = "iso_date::option::deserialize")]
            until: Option<Date>,
        }
        let q: Query = serde_json::from_str("{}").unwrap();
        assert!(q.until.is_none());
        let q: Query = serde_json::from_str(r#"{"until":null}"#).unwrap();
        assert!(q.until.is_none());
        let q: Query = serde_json::from_str(r#"{"until":"2025-03-01"}"#).unwrap();
        assert_eq!(q.until.map(|d| d.day()), Some(1));
        assert!(serde_json::from_str::<Query>(r#"{"until":"03/01/2025"}"#).is_err());
    }
}
