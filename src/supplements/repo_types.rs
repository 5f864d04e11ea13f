use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrients::Nutrient;

/// A supplement taken on a given day. Only the seven amounts in
/// [`Nutrient::SUPPLEMENT_TRACKED`] are stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplement {
    pub id: Uuid,
    pub daily_log_id: Uuid,
    pub name: String,
    pub dosage: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time_taken: String,
    pub notes: String,
    pub vitamin_a_mcg: f64,
    pub vitamin_c_mg: f64,
    pub vitamin_d_mcg: f64,
    pub calcium_mg: f64,
    pub iron_mg: f64,
    pub potassium_mg: f64,
    pub sodium_mg: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Supplement {
    /// Stored amount of `nutrient`; `None` for nutrients supplements don't track.
    pub fn amount(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::VitaminA => Some(self.vitamin_a_mcg),
            Nutrient::VitaminC => Some(self.vitamin_c_mg),
            Nutrient::VitaminD => Some(self.vitamin_d_mcg),
            Nutrient::Calcium => Some(self.calcium_mg),
            Nutrient::Iron => Some(self.iron_mg),
            Nutrient::Potassium => Some(self.potassium_mg),
            Nutrient::Sodium => Some(self.sodium_mg),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(name: &str) -> Supplement {
    Supplement {
        id: Uuid::new_v4(),
        daily_log_id: Uuid::nil(),
        name: name.into(),
        dosage: String::new(),
        kind: "supplement".into(),
        time_taken: String::new(),
        notes: String::new(),
        vitamin_a_mcg: 0.0,
        vitamin_c_mg: 0.0,
        vitamin_d_mcg: 0.0,
        calcium_mg: 0.0,
        iron_mg: 0.0,
        potassium_mg: 0.0,
        sodium_mg: 0.0,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}
