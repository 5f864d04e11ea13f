use async_trait::async_trait;
use serde_json::Value;

use super::dto::{ChatSuggestion, ChatTurn, FoodAnalysis, FoodDescription, FoodEstimate, ImageInput};
use super::{AiError, NutritionAdvisor};
use crate::nutrients::Micronutrients;

/// Scripted advisor for tests: fixed answers, or a status error on every call.
#[derive(Clone, Default)]
pub struct FakeAdvisor {
    fail: bool,
    micros: Micronutrients,
}

impl FakeAdvisor {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_micros(mut self, micros: Micronutrients) -> Self {
        self.micros = micros;
        self
    }

    fn check(&self) -> Result<(), AiError> {
        if self.fail {
            Err(AiError::Status {
                status: 503,
                body: "overloaded".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NutritionAdvisor for FakeAdvisor {
    async fn analyze_food(
        &self,
        images: &[ImageInput],
        notes: &str,
    ) -> Result<FoodAnalysis, AiError> {
        self.check()?;
        Ok(FoodAnalysis {
            items: vec![FoodEstimate {
                name: "Toast".into(),
                calories: 80.0,
                ..FoodEstimate::default()
            }],
            confidence: "medium".into(),
            notes: format!("{} image(s); {notes}", images.len()),
            error: None,
        })
    }

    async fn chat_suggest(
        &self,
        message: &str,
        history: &[ChatTurn],
        _context: &Value,
    ) -> Result<ChatSuggestion, AiError> {
        self.check()?;
        Ok(ChatSuggestion {
            message: format!("heard {message:?} after {} turn(s)", history.len()),
            ..ChatSuggestion::default()
        })
    }

    async fn estimate_food_micronutrients(
        &self,
        _food: &FoodDescription,
    ) -> Result<Micronutrients, AiError> {
        self.check()?;
        Ok(self.micros.clone())
    }

    async fn estimate_supplement_micronutrients(
        &self,
        _name: &str,
        _dosage: &str,
    ) -> Result<Micronutrients, AiError> {
        self.check()?;
        Ok(self.micros.clone())
    }
}
