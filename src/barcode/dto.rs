//! OpenFoodFacts product payloads and the per-100 g product we hand back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::nutrients::{Micronutrients, Nutrient};

const G_TO_MG: f64 = 1_000.0;
const G_TO_MCG: f64 = 1_000_000.0;

/// OpenFoodFacts reports these per 100 g in grams.
const MICRONUTRIENT_KEYS: [(Nutrient, &str, f64); 7] = [
    (Nutrient::VitaminA, "vitamin-a", G_TO_MCG),
    (Nutrient::VitaminC, "vitamin-c", G_TO_MG),
    (Nutrient::VitaminD, "vitamin-d", G_TO_MCG),
    (Nutrient::Calcium, "calcium", G_TO_MG),
    (Nutrient::Iron, "iron", G_TO_MG),
    (Nutrient::Potassium, "potassium", G_TO_MG),
    (Nutrient::Sodium, "sodium", G_TO_MG),
];

/// EAN-8 through GTIN-14.
pub fn validate_barcode(code: &str) -> Result<(), AppError> {
    if (8..=14).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation("barcode must be 8 to 14 digits".into()))
    }
}

#[derive(Debug, Deserialize)]
pub struct OffResponse {
    #[serde(default)]
    pub status: i64,
    pub product: Option<OffProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OffProduct {
    pub product_name: Option<String>,
    pub brands: Option<String>,
    pub serving_size: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub nutriments: Map<String, Value>,
}

impl OffProduct {
    /// Per-100 g value of `key`; missing or non-numeric values read as 0.
    /// Some products carry numbers as strings.
    fn per_100g(&self, key: &str) -> f64 {
        match self.nutriments.get(&format!("{key}_100g")) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Nutrition per 100 g, shaped like a food entry body so the client can
/// log it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarcodeProduct {
    pub barcode: String,
    pub name: String,
    pub brand: String,
    pub serving_size: String,
    pub image_url: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub micronutrients: Micronutrients,
}

fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_owned()
}

impl BarcodeProduct {
    /// `None` when OpenFoodFacts doesn't know the code.
    pub fn from_response(barcode: &str, resp: OffResponse) -> Option<Self> {
        if resp.status != 1 {
            return None;
        }
        let p = resp.product?;

        let mut micronutrients = Micronutrients::default();
        for (nutrient, key, scale) in MICRONUTRIENT_KEYS {
            *micronutrients.get_mut(nutrient) = p.per_100g(key) * scale;
        }

        Some(Self {
            barcode: barcode.to_owned(),
            name: text_or(p.product_name.as_deref(), "Unknown Product"),
            brand: text_or(p.brands.as_deref(), ""),
            serving_size: text_or(p.serving_size.as_deref(), "100g"),
            image_url: text_or(p.image_url.as_deref(), ""),
            calories: p.per_100g("energy-kcal"),
            protein_g: p.per_100g("proteins"),
            carbs_g: p.per_100g("carbohydrates"),
            fat_g: p.per_100g("fat"),
            fiber_g: p.per_100g("fiber"),
            sugar_g: p.per_100g("sugars"),
            sodium_mg: micronutrients.sodium_mg,
            micronutrients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn parse(body: Value) -> Option<BarcodeProduct> {
        let resp: OffResponse = serde_json::from_value(body).unwrap();
        BarcodeProduct::from_response("3017620422003", resp)
    }

    #[test]
    fn maps_per_100g_nutriments() {
        let p = parse(json!({
            "status": 1,
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero",
                "serving_size": "15 g",
                "image_url": "https://images.openfoodfacts.org/nutella.jpg",
                "nutriments": {
                    "energy-kcal_100g": 539,
                    "proteins_100g": 6.3,
                    "carbohydrates_100g": 57.5,
                    "fat_100g": 30.9,
                    "sugars_100g": 56.3,
                    "sodium_100g": 0.0428,
                    "calcium_100g": "0.108",
                    "iron_100g": 0.0042,
                    "vitamin-d_100g": 0.0000025
                }
            }
        }))
        .unwrap();

        assert_eq!(p.name, "Nutella");
        assert_eq!(p.brand, "Ferrero");
        assert_eq!(p.barcode, "3017620422003");
        assert_eq!(p.calories, 539.0);
        assert_eq!(p.fiber_g, 0.0);
        assert!(close(p.sodium_mg, 42.8));
        assert!(close(p.micronutrients.sodium_mg, 42.8));
        assert!(close(p.micronutrients.calcium_mg, 108.0));
        assert!(close(p.micronutrients.iron_mg, 4.2));
        assert!(close(p.micronutrients.vitamin_d_mcg, 2.5));
        assert_eq!(p.micronutrients.zinc_mg, 0.0);
    }

    #[test]
    fn missing_fields_fall_back() {
        let p = parse(json!({"status": 1, "product": {"product_name": "  "}})).unwrap();
        assert_eq!(p.name, "Unknown Product");
        assert_eq!(p.serving_size, "100g");
        assert_eq!(p.brand, "");
        assert_eq!(p.calories, 0.0);
        assert!(p.micronutrients.is_zero());
    }

    #[test]
    fn unknown_code_is_none() {
        assert!(parse(json!({"status": 0, "status_verbose": "product not found"})).is_none());
        assert!(parse(json!({"status": 1})).is_none());
    }

    #[test]
    fn barcode_must_be_8_to_14_digits() {
        assert!(validate_barcode("3017620422003").is_ok());
        assert!(validate_barcode("12345678").is_ok());
        assert!(validate_barcode("1234567").is_err());
        assert!(validate_barcode("123456789012345").is_err());
        assert!(validate_barcode("30176204x2003").is_err());
        assert!(validate_barcode("../../etc").is_err());
    }
}
