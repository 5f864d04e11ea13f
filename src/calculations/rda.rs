use crate::nutrients::{Micronutrients, Nutrient};

use super::Gender;

fn adult_base(female: bool) -> Micronutrients {
    let pick = |m: f64, f: f64| if female { f } else { m };
    Micronutrients {
        vitamin_a_mcg: pick(900.0, 700.0),
        vitamin_c_mg: pick(90.0, 75.0),
        vitamin_d_mcg: 15.0,
        vitamin_e_mg: 15.0,
        vitamin_k_mcg: pick(120.0, 90.0),
        vitamin_b6_mg: 1.3,
        vitamin_b12_mcg: 2.4,
        folate_mcg: 400.0,
        calcium_mg: 1000.0,
        iron_mg: pick(8.0, 18.0),
        magnesium_mg: pick(400.0, 310.0),
        potassium_mg: pick(3400.0, 2600.0),
        zinc_mg: pick(11.0, 8.0),
        sodium_mg: 1500.0,
    }
}

fn binary_rda(age: i32, female: bool) -> Micronutrients {
    let mut rda = adult_base(female);
    if age >= 51 {
        rda.vitamin_b6_mg = if female { 1.5 } else { 1.7 };
        rda.magnesium_mg = if female { 320.0 } else { 420.0 };
        if female {
            rda.calcium_mg = 1200.0;
            rda.iron_mg = 8.0;
        }
    }
    if age >= 71 {
        rda.vitamin_d_mcg = 20.0;
        rda.calcium_mg = 1200.0;
    }
    rda
}

/// Recommended daily allowance of each tracked micronutrient.
///
/// `Other` averages the male and female tables key by key.
pub fn rda_targets(age: i32, gender: Gender) -> Micronutrients {
    match gender {
        Gender::Male => binary_rda(age, false),
        Gender::Female => binary_rda(age, true),
        Gender::Other => {
            let male = binary_rda(age, false);
            let female = binary_rda(age, true);
            Micronutrients::from_fn(|n: Nutrient| (male.get(n) + female.get(n)) / 2.0)
        }
    }
}
