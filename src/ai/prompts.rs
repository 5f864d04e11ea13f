use serde_json::Value;

use super::dto::FoodDescription;

const JSON_ONLY: &str =
    "Reply with a single JSON document and nothing else: no prose before or after it.";

const SEVEN_MICROS_SHAPE: &str = r#"{
  "vitamin_a_mcg": 0,
  "vitamin_c_mg": 0,
  "vitamin_d_mcg": 0,
  "calcium_mg": 0,
  "iron_mg": 0,
  "potassium_mg": 0,
  "sodium_mg": 0
}"#;

pub fn food_image(image_count: usize, notes: &str) -> String {
    let mut prompt = if image_count > 1 {
        format!(
            "These {image_count} photos show the same meal from different angles. \
             Use every view to judge portion sizes and estimate the nutrition of what is shown."
        )
    } else {
        "Estimate the nutrition of everything shown in this photo.".to_string()
    };
    prompt.push_str(
        "\n\nList every item separately: main dishes, sides, snacks, desserts and any drinks \
         (water, coffee, juice, soda, alcohol, smoothies).",
    );
    if !notes.trim().is_empty() {
        prompt.push_str(&format!(
            "\n\nThe user added these notes, take them into account: {}",
            notes.trim()
        ));
    }
    prompt.push_str("\n\n");
    prompt.push_str(JSON_ONLY);
    prompt.push_str(
        r#"
Use this shape, replacing the zeros with your estimates:
{
  "items": [
    {
      "name": "food name",
      "serving_size": "e.g. 1 cup, 100g, 1 medium apple",
      "calories": 0,
      "protein_g": 0,
      "carbs_g": 0,
      "fat_g": 0,
      "fiber_g": 0,
      "sugar_g": 0,
      "micronutrients": {
        "vitamin_a_mcg": 0,
        "vitamin_c_mg": 0,
        "vitamin_d_mcg": 0,
        "calcium_mg": 0,
        "iron_mg": 0,
        "potassium_mg": 0,
        "sodium_mg": 0
      }
    }
  ],
  "confidence": "high | medium | low",
  "notes": "observations about portions or viewing angles"
}"#,
    );
    prompt
}

pub fn chat_system(context: &Value) -> String {
    let mut system = format!(
        r#"You help people log food, water and exercise from plain-language descriptions.
{JSON_ONLY}
Shape:
{{
  "items": [
    {{
      "name": "food name",
      "serving_size": "amount",
      "calories": 0,
      "protein_g": 0,
      "carbs_g": 0,
      "fat_g": 0,
      "fiber_g": 0,
      "sugar_g": 0,
      "meal_type": "breakfast | lunch | dinner | snack"
    }}
  ],
  "actions": {{
    "water_ml": 0,
    "exercise": {{ "type": "", "duration_minutes": 0, "notes": "" }}
  }},
  "needs_clarification": false,
  "message": "short friendly reply"
}}

Meal type: morning or breakfast -> breakfast; midday, noon or lunch -> lunch;
evening, tonight, supper or dinner -> dinner; no time mentioned -> snack.
Water: a glass or cup is 250 ml, a bottle 500 ml, a liter 1000 ml, ml values as given.
Exercise: pick one of Running, Walking, Cycling, Swimming, Weightlifting, Yoga, Cardio,
Sports, HIIT, Other and give the duration in minutes ("an hour at the gym" is
Weightlifting for 60).
With only water or exercise mentioned, return an empty items array.
If something is missing, set needs_clarification to true and ask in message.
All nutrition and numeric fields are numbers, never strings."#
    );
    if !context.is_null() {
        system.push_str(&format!("\n\nWhat is already known about the user's day: {context}"));
    }
    system
}

pub fn food_micronutrients(food: &FoodDescription) -> String {
    format!(
        "Estimate the micronutrients in this food.\n\n\
         Food: {}\nCalories: {}\nProtein: {}g\nCarbs: {}g\nFat: {}g\n\n\
         {JSON_ONLY}\nShape:\n{SEVEN_MICROS_SHAPE}\n\n\
         Base the numbers on typical content for this food; use 0 where it has none.",
        food.name, food.calories, food.protein_g, food.carbs_g, food.fat_g
    )
}

pub fn supplement_micronutrients(name: &str, dosage: &str) -> String {
    format!(
        "Work out which micronutrients this supplement provides and how much.\n\n\
         Supplement: {name}\nDosage: {dosage}\n\n\
         Conversions: vitamin D 1 IU = 0.025 mcg, vitamin A 1 IU = 0.3 mcg, mg stays mg.\n\n\
         {JSON_ONLY}\nShape:\n{SEVEN_MICROS_SHAPE}\n\n\
         Use 0 for anything the supplement does not provide."
    )
}
