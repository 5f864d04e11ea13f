use axum::Router;
use thiserror::Error;
use tracing::warn;

use crate::nutrients::Micronutrients;
use crate::state::AppState;

mod client;
pub mod dto;
#[cfg(test)]
pub mod fake;
mod handlers;
mod parse;
mod prompts;

pub use client::{AnthropicClient, NutritionAdvisor};
pub use dto::FoodDescription;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply had no text content")]
    MissingText,
    #[error("reply was not the expected JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}

/// Micronutrient estimate for a logged food, or all zeros when the model
/// can't provide one. A food entry always gets its detail row.
pub async fn food_micros_or_zero(
    advisor: &dyn NutritionAdvisor,
    food: &FoodDescription,
) -> Micronutrients {
    match advisor.estimate_food_micronutrients(food).await {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, food = %food.name, "micronutrient estimate failed, storing zeros");
            Micronutrients::default()
        }
    }
}

/// Supplement counterpart of [`food_micros_or_zero`], limited to the amounts
/// supplements carry.
pub async fn supplement_micros_or_zero(
    advisor: &dyn NutritionAdvisor,
    name: &str,
    dosage: &str,
) -> Micronutrients {
    match advisor.estimate_supplement_micronutrients(name, dosage).await {
        Ok(m) => m.supplement_subset(),
        Err(e) => {
            warn!(error = %e, supplement = %name, "supplement estimate failed, storing zeros");
            Micronutrients::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeAdvisor;
    use super::*;

    fn oatmeal() -> FoodDescription {
        FoodDescription {
            name: "Oatmeal".into(),
            calories: 150.0,
            protein_g: 5.0,
            carbs_g: 27.0,
            fat_g: 3.0,
        }
    }

    #[tokio::test]
    async fn failed_estimate_becomes_zeros() {
        let advisor = FakeAdvisor::failing();
        let m = food_micros_or_zero(&advisor, &oatmeal()).await;
        assert_eq!(m, Micronutrients::default());
        let s = supplement_micros_or_zero(&advisor, "Iron", "18 mg").await;
        assert_eq!(s, Micronutrients::default());
    }

    #[tokio::test]
    async fn supplement_estimate_is_trimmed_to_tracked_amounts() {
        let advisor = FakeAdvisor::default().with_micros(Micronutrients::from_fn(|_| 2.0));
        let s = supplement_micros_or_zero(&advisor, "Multivitamin", "1 tablet").await;
        assert_eq!(s.iron_mg, 2.0);
        assert_eq!(s.zinc_mg, 0.0);
        let f = food_micros_or_zero(&advisor, &oatmeal()).await;
        assert_eq!(f.zinc_mg, 2.0);
    }
}
