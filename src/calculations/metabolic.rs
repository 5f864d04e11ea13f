use serde::{Deserialize, Serialize};

use super::{round_whole, ActivityLevel, Gender, Goal};

const GOAL_CALORIE_DELTA: f64 = 500.0;
const FAT_ENERGY_SHARE: f64 = 0.275;
const CARBS_FLOOR_G: i32 = 50;
const WATER_ML_PER_KG: f64 = 35.0;
const WATER_STEP_ML: f64 = 250.0;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Daily gram targets for the three macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
}

/// The body metrics every derived target is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub age: i32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Every derived field of a profile, produced in one pass so none of them
/// can drift from the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_goal: f64,
    pub macros: MacroTargets,
    pub water_target_ml: i32,
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day, unrounded.
///
/// `Other` is the mean of the male and female equations.
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    let male = base + 5.0;
    let female = base - 161.0;
    match gender {
        Gender::Male => male,
        Gender::Female => female,
        Gender::Other => (male + female) / 2.0,
    }
}

fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtraActive => 1.9,
    }
}

/// Total daily energy expenditure: BMR scaled by activity.
pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_multiplier(activity_level)
}

pub fn calorie_goal(tdee: f64, goal: Goal) -> f64 {
    match goal {
        Goal::Lose => tdee - GOAL_CALORIE_DELTA,
        Goal::Gain => tdee + GOAL_CALORIE_DELTA,
        Goal::Maintain => tdee,
    }
}

fn protein_g_per_kg(goal: Goal) -> f64 {
    match goal {
        Goal::Lose => 2.0,
        Goal::Maintain => 1.6,
        Goal::Gain => 1.8,
    }
}

/// Splits a calorie goal into protein, fat and carbs.
///
/// Protein scales with body weight, fat takes 27.5% of energy and carbs
/// fill the rest. When carbs would land under 50 g they are held at 50 g
/// and fat absorbs the difference; fat is not floored afterwards, so it
/// can go negative for very small calorie goals.
pub fn macro_targets(calorie_goal: f64, weight_kg: f64, goal: Goal) -> MacroTargets {
    let protein_g = round_whole(weight_kg * protein_g_per_kg(goal));
    let mut fat_g = round_whole(calorie_goal * FAT_ENERGY_SHARE / KCAL_PER_G_FAT);

    let protein_kcal = f64::from(protein_g) * KCAL_PER_G_PROTEIN;
    let remaining = calorie_goal - protein_kcal - f64::from(fat_g) * KCAL_PER_G_FAT;
    let mut carbs_g = round_whole(remaining / KCAL_PER_G_CARBS);

    if carbs_g < CARBS_FLOOR_G {
        carbs_g = CARBS_FLOOR_G;
        let remaining = calorie_goal - protein_kcal - f64::from(carbs_g) * KCAL_PER_G_CARBS;
        fat_g = round_whole(remaining / KCAL_PER_G_FAT);
        tracing::debug!(calorie_goal, protein_g, fat_g, "carbs floor applied");
    }

    MacroTargets {
        protein_g,
        carbs_g,
        fat_g,
    }
}

fn hydration_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.0,
        ActivityLevel::LightlyActive => 1.1,
        ActivityLevel::ModeratelyActive => 1.15,
        ActivityLevel::VeryActive => 1.2,
        ActivityLevel::ExtraActive => 1.25,
    }
}

/// Daily water target in ml, rounded to the nearest 250 ml.
pub fn water_target_ml(weight_kg: f64, activity_level: ActivityLevel) -> i32 {
    let ml = weight_kg * WATER_ML_PER_KG * hydration_multiplier(activity_level);
    round_whole(ml / WATER_STEP_ML) * WATER_STEP_ML as i32
}

pub fn derive_targets(m: &BodyMetrics) -> DerivedTargets {
    let bmr = bmr(m.weight_kg, m.height_cm, m.age, m.gender);
    let tdee = tdee(bmr, m.activity_level);
    let calorie_goal = calorie_goal(tdee, m.goal);
    DerivedTargets {
        bmr,
        tdee,
        calorie_goal,
        macros: macro_targets(calorie_goal, m.weight_kg, m.goal),
        water_target_ml: water_target_ml(m.weight_kg, m.activity_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn bmr_for_other_is_mean_of_male_and_female() {
        for (w, h, a) in [(70.0, 175.0, 30), (52.3, 160.2, 44), (120.0, 190.0, 67)] {
            let male = bmr(w, h, a, Gender::Male);
            let female = bmr(w, h, a, Gender::Female);
            assert!(close(bmr(w, h, a, Gender::Other), (male + female) / 2.0));
            assert!(close(male - female, 166.0));
        }
    }

    #[test]
    fn tdee_increases_with_activity() {
        for pair in LEVELS.windows(2) {
            assert!(tdee(1500.0, pair[0]) < tdee(1500.0, pair[1]));
        }
        assert!(close(tdee(1000.0, ActivityLevel::Sedentary), 1200.0));
        assert!(close(tdee(1000.0, ActivityLevel::ExtraActive), 1900.0));
    }

    #[test]
    fn calorie_goal_offsets_are_symmetric() {
        let t = 2345.67;
        assert!(close(calorie_goal(t, Goal::Lose) + 500.0, calorie_goal(t, Goal::Maintain)));
        assert!(close(calorie_goal(t, Goal::Maintain), calorie_goal(t, Goal::Gain) - 500.0));
    }

    #[test]
    fn reference_male_losing_weight() {
        let m = BodyMetrics {
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::Lose,
        };
        let d = derive_targets(&m);
        assert!(close(d.bmr, 1648.75));
        assert!(close(d.tdee, 2555.5625));
        assert!(close(d.calorie_goal, 2055.5625));
        assert_eq!(
            d.macros,
            MacroTargets {
                protein_g: 140,
                carbs_g: 232,
                fat_g: 63
            }
        );
        assert_eq!(d.water_target_ml, 2750);
    }

    #[test]
    fn macros_account_for_the_calorie_goal() {
        let cases = [
            (2055.5625, 70.0, Goal::Lose),
            (2800.0, 82.5, Goal::Gain),
            (1850.0, 58.0, Goal::Maintain),
            (3400.0, 95.0, Goal::Gain),
        ];
        for (goal_kcal, weight, goal) in cases {
            let m = macro_targets(goal_kcal, weight, goal);
            assert!(m.carbs_g > 50);
            let kcal = f64::from(m.protein_g) * 4.0 + f64::from(m.carbs_g) * 4.0 + f64::from(m.fat_g) * 9.0;
            assert!((kcal - goal_kcal).abs() <= 6.5, "{goal_kcal} vs {kcal}");
        }
    }

    #[test]
    fn carbs_floor_moves_energy_into_fat() {
        let m = macro_targets(1000.0, 100.0, Goal::Lose);
        assert_eq!(m.protein_g, 200);
        assert_eq!(m.carbs_g, 50);
        assert_eq!(m.fat_g, 0);
    }

    #[test]
    fn carbs_floor_can_leave_fat_negative() {
        let m = macro_targets(900.0, 100.0, Goal::Lose);
        assert_eq!(m.carbs_g, 50);
        assert_eq!(m.fat_g, -11);
    }

    #[test]
    fn water_target_snaps_to_250ml() {
        assert_eq!(water_target_ml(60.0, ActivityLevel::Sedentary), 2000);
        assert_eq!(water_target_ml(70.0, ActivityLevel::ModeratelyActive), 2750);
        for w in [45.0, 58.3, 71.9, 88.0, 104.4] {
            for level in LEVELS {
                assert_eq!(water_target_ml(w, level) % 250, 0);
            }
        }
    }
}
