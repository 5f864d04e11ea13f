//! Day breakdown: macro totals plus per-micronutrient totals, each with the
//! foods and supplements that contributed to it.

use serde::Serialize;

use crate::calculations::round_tenth;
use crate::food_entries::FoodEntry;
use crate::nutrients::{Micronutrients, Nutrient, PerNutrient};
use crate::supplements::Supplement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Food,
    Supplement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientSource {
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NutritionBreakdown {
    pub macros: MacroTotals,
    pub micronutrients: Micronutrients,
    pub micronutrient_sources: PerNutrient<Vec<NutrientSource>>,
}

impl NutritionBreakdown {
    fn add(&mut self, nutrient: Nutrient, amount: f64, name: &str, kind: SourceKind) {
        if amount <= 0.0 {
            return;
        }
        *self.micronutrients.get_mut(nutrient) += amount;
        self.micronutrient_sources.get_mut(nutrient).push(NutrientSource {
            name: name.to_owned(),
            amount: round_tenth(amount),
            kind,
        });
    }
}

/// Sources keep input order, so pass entries and supplements oldest first.
pub fn aggregate_nutrition(entries: &[FoodEntry], supplements: &[Supplement]) -> NutritionBreakdown {
    let mut out = NutritionBreakdown::default();

    for e in entries {
        let m = &mut out.macros;
        m.calories += e.calories;
        m.protein_g += e.protein_g;
        m.carbs_g += e.carbs_g;
        m.fat_g += e.fat_g;
        m.fiber_g += e.fiber_g;
        m.sugar_g += e.sugar_g;

        for (nutrient, amount) in e.micronutrients.iter() {
            out.add(nutrient, *amount, &e.name, SourceKind::Food);
        }
    }

    for s in supplements {
        for nutrient in Nutrient::SUPPLEMENT_TRACKED {
            if let Some(amount) = s.amount(nutrient) {
                out.add(nutrient, amount, &s.name, SourceKind::Supplement);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplements::repo_types::sample as supplement;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn entry(name: &str, calories: f64, micros: Micronutrients) -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4(),
            daily_log_id: Uuid::nil(),
            name: name.into(),
            calories,
            protein_g: 10.0,
            carbs_g: 20.0,
            fat_g: 5.0,
            fiber_g: 2.0,
            sugar_g: 1.0,
            meal_type: None,
            serving_size: "1 serving".into(),
            image_id: None,
            barcode: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            micronutrients: micros,
        }
    }

    #[test]
    fn empty_day_is_all_zero() {
        let b = aggregate_nutrition(&[], &[]);
        assert_eq!(b.macros, MacroTotals::default());
        assert!(b.micronutrients.is_zero());
        assert!(b.micronutrient_sources.iter().all(|(_, s)| s.is_empty()));
    }

    #[test]
    fn sums_macros_and_attributes_sources_in_order() {
        let mut spinach = Micronutrients::default();
        spinach.iron_mg = 2.71;
        spinach.vitamin_k_mcg = 145.0;
        let mut beef = Micronutrients::default();
        beef.iron_mg = 2.6;

        let b = aggregate_nutrition(
            &[entry("Spinach", 23.0, spinach), entry("Beef", 250.0, beef)],
            &[],
        );
        assert_eq!(b.macros.calories, 273.0);
        assert_eq!(b.macros.protein_g, 20.0);
        assert_eq!(b.macros.sugar_g, 2.0);
        assert!((b.micronutrients.iron_mg - 5.31).abs() < 1e-9);

        let iron = b.micronutrient_sources.get(Nutrient::Iron);
        assert_eq!(iron.len(), 2);
        assert_eq!(iron[0].name, "Spinach");
        assert_eq!(iron[0].amount, 2.7);
        assert_eq!(iron[1].name, "Beef");
        assert_eq!(b.micronutrient_sources.get(Nutrient::VitaminK).len(), 1);
    }

    #[test]
    fn zero_amounts_are_not_sources() {
        let b = aggregate_nutrition(&[entry("Water", 0.0, Micronutrients::default())], &[]);
        assert!(b.micronutrient_sources.get(Nutrient::Calcium).is_empty());
        assert_eq!(b.macros.protein_g, 10.0);
    }

    #[test]
    fn supplements_add_only_tracked_amounts() {
        let mut d3 = supplement("Vitamin D3");
        d3.vitamin_d_mcg = 25.0;
        d3.calcium_mg = 0.0;
        let mut food = Micronutrients::default();
        food.vitamin_d_mcg = 2.5;

        let b = aggregate_nutrition(&[entry("Egg", 70.0, food)], &[d3]);
        assert_eq!(b.micronutrients.vitamin_d_mcg, 27.5);
        let sources = b.micronutrient_sources.get(Nutrient::VitaminD);
        assert_eq!(sources[0].kind, SourceKind::Food);
        assert_eq!(sources[1].kind, SourceKind::Supplement);
        assert_eq!(sources[1].amount, 25.0);
        assert!(b.micronutrient_sources.get(Nutrient::Calcium).is_empty());
        // supplements never touch macros
        assert_eq!(b.macros.calories, 70.0);
    }

    #[test]
    fn small_source_amounts_round_up_on_decimal_ties() {
        let mut trace = Micronutrients::default();
        trace.iron_mg = 0.05;
        trace.zinc_mg = 1.05;

        let b = aggregate_nutrition(&[entry("Rice cake", 35.0, trace)], &[]);
        let iron = b.micronutrient_sources.get(Nutrient::Iron);
        assert_eq!(iron.len(), 1);
        assert_eq!(iron[0].amount, 0.1);
        assert_eq!(b.micronutrient_sources.get(Nutrient::Zinc)[0].amount, 1.1);
        // totals are not rounded
        assert_eq!(b.micronutrients.iron_mg, 0.05);
    }

    #[test]
    fn source_serializes_type_field() {
        let s = NutrientSource {
            name: "Kale".into(),
            amount: 1.5,
            kind: SourceKind::Food,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], "food");
    }
}
