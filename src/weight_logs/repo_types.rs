use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One weigh-in; at most one per user per date.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WeightLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub weight_kg: f64,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
