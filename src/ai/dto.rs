use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::calculations::{ActivityLevel, Gender, Goal};
use crate::nutrients::Micronutrients;

/// One photo handed to the model.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub media_type: String,
    pub data: Bytes,
}

/// A food or drink the model recognised, with its estimated nutrition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodEstimate {
    pub name: String,
    pub serving_size: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micronutrients: Option<Micronutrients>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    #[serde(default)]
    pub items: Vec<FoodEstimate>,
    #[serde(default = "default_confidence")]
    pub confidence: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_confidence() -> String {
    "low".into()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_minutes: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatActions {
    pub water_ml: f64,
    pub exercise: Option<ExerciseAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSuggestion {
    pub items: Vec<FoodEstimate>,
    pub actions: ChatActions,
    pub needs_clarification: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// What the micronutrient estimate for a logged food is based on.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDescription {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

// --- HTTP bodies ---

#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    pub image_id: Uuid,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub force_reanalyze: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    #[serde(flatten)]
    pub analysis: FoodAnalysis,
    pub is_cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_analyzed: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub context: Value,
}

#[derive(Debug, Deserialize)]
pub struct GoalPreviewRequest {
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GoalPreview {
    pub bmr: i32,
    pub tdee: i32,
    pub calorie_goal: i32,
    pub goal: Goal,
}
