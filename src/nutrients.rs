use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// Unit a micronutrient amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Mg,
    Mcg,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Mg => "mg",
            Unit::Mcg => "mcg",
        }
    }
}

/// The 14 tracked micronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB6,
    VitaminB12,
    Folate,
    Calcium,
    Iron,
    Magnesium,
    Potassium,
    Zinc,
    Sodium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 14] = [
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::VitaminB6,
        Nutrient::VitaminB12,
        Nutrient::Folate,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Potassium,
        Nutrient::Zinc,
        Nutrient::Sodium,
    ];

    /// Supplements only carry these seven amounts.
    pub const SUPPLEMENT_TRACKED: [Nutrient; 7] = [
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Potassium,
        Nutrient::Sodium,
    ];

    /// Storage/wire key, e.g. `vitamin_b12_mcg`.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::VitaminA => "vitamin_a_mcg",
            Nutrient::VitaminC => "vitamin_c_mg",
            Nutrient::VitaminD => "vitamin_d_mcg",
            Nutrient::VitaminE => "vitamin_e_mg",
            Nutrient::VitaminK => "vitamin_k_mcg",
            Nutrient::VitaminB6 => "vitamin_b6_mg",
            Nutrient::VitaminB12 => "vitamin_b12_mcg",
            Nutrient::Folate => "folate_mcg",
            Nutrient::Calcium => "calcium_mg",
            Nutrient::Iron => "iron_mg",
            Nutrient::Magnesium => "magnesium_mg",
            Nutrient::Potassium => "potassium_mg",
            Nutrient::Zinc => "zinc_mg",
            Nutrient::Sodium => "sodium_mg",
        }
    }

    /// Name used for vitamin targets: the key title-cased word by word.
    pub fn display_name(self) -> &'static str {
        match self {
            Nutrient::VitaminA => "Vitamin A Mcg",
            Nutrient::VitaminC => "Vitamin C Mg",
            Nutrient::VitaminD => "Vitamin D Mcg",
            Nutrient::VitaminE => "Vitamin E Mg",
            Nutrient::VitaminK => "Vitamin K Mcg",
            Nutrient::VitaminB6 => "Vitamin B6 Mg",
            Nutrient::VitaminB12 => "Vitamin B12 Mcg",
            Nutrient::Folate => "Folate Mcg",
            Nutrient::Calcium => "Calcium Mg",
            Nutrient::Iron => "Iron Mg",
            Nutrient::Magnesium => "Magnesium Mg",
            Nutrient::Potassium => "Potassium Mg",
            Nutrient::Zinc => "Zinc Mg",
            Nutrient::Sodium => "Sodium Mg",
        }
    }

    pub fn unit(self) -> Unit {
        if self.key().ends_with("_mcg") {
            Unit::Mcg
        } else {
            Unit::Mg
        }
    }
}

/// One value per tracked micronutrient, serialized with the storage keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerNutrient<T> {
    pub vitamin_a_mcg: T,
    pub vitamin_c_mg: T,
    pub vitamin_d_mcg: T,
    pub vitamin_e_mg: T,
    pub vitamin_k_mcg: T,
    pub vitamin_b6_mg: T,
    pub vitamin_b12_mcg: T,
    pub folate_mcg: T,
    pub calcium_mg: T,
    pub iron_mg: T,
    pub magnesium_mg: T,
    pub potassium_mg: T,
    pub zinc_mg: T,
    pub sodium_mg: T,
}

/// Amounts for the 14 micronutrients; absent keys deserialize to 0.
pub type Micronutrients = PerNutrient<f64>;

impl<T> PerNutrient<T> {
    pub fn get(&self, nutrient: Nutrient) -> &T {
        match nutrient {
            Nutrient::VitaminA => &self.vitamin_a_mcg,
            Nutrient::VitaminC => &self.vitamin_c_mg,
            Nutrient::VitaminD => &self.vitamin_d_mcg,
            Nutrient::VitaminE => &self.vitamin_e_mg,
            Nutrient::VitaminK => &self.vitamin_k_mcg,
            Nutrient::VitaminB6 => &self.vitamin_b6_mg,
            Nutrient::VitaminB12 => &self.vitamin_b12_mcg,
            Nutrient::Folate => &self.folate_mcg,
            Nutrient::Calcium => &self.calcium_mg,
            Nutrient::Iron => &self.iron_mg,
            Nutrient::Magnesium => &self.magnesium_mg,
            Nutrient::Potassium => &self.potassium_mg,
            Nutrient::Zinc => &self.zinc_mg,
            Nutrient::Sodium => &self.sodium_mg,
        }
    }

    pub fn get_mut(&mut self, nutrient: Nutrient) -> &mut T {
        match nutrient {
            Nutrient::VitaminA => &mut self.vitamin_a_mcg,
            Nutrient::VitaminC => &mut self.vitamin_c_mg,
            Nutrient::VitaminD => &mut self.vitamin_d_mcg,
            Nutrient::VitaminE => &mut self.vitamin_e_mg,
            Nutrient::VitaminK => &mut self.vitamin_k_mcg,
            Nutrient::VitaminB6 => &mut self.vitamin_b6_mg,
            Nutrient::VitaminB12 => &mut self.vitamin_b12_mcg,
            Nutrient::Folate => &mut self.folate_mcg,
            Nutrient::Calcium => &mut self.calcium_mg,
            Nutrient::Iron => &mut self.iron_mg,
            Nutrient::Magnesium => &mut self.magnesium_mg,
            Nutrient::Potassium => &mut self.potassium_mg,
            Nutrient::Zinc => &mut self.zinc_mg,
            Nutrient::Sodium => &mut self.sodium_mg,
        }
    }

    pub fn from_fn(mut f: impl FnMut(Nutrient) -> T) -> Self {
        Self {
            vitamin_a_mcg: f(Nutrient::VitaminA),
            vitamin_c_mg: f(Nutrient::VitaminC),
            vitamin_d_mcg: f(Nutrient::VitaminD),
            vitamin_e_mg: f(Nutrient::VitaminE),
            vitamin_k_mcg: f(Nutrient::VitaminK),
            vitamin_b6_mg: f(Nutrient::VitaminB6),
            vitamin_b12_mcg: f(Nutrient::VitaminB12),
            folate_mcg: f(Nutrient::Folate),
            calcium_mg: f(Nutrient::Calcium),
            iron_mg: f(Nutrient::Iron),
            magnesium_mg: f(Nutrient::Magnesium),
            potassium_mg: f(Nutrient::Potassium),
            zinc_mg: f(Nutrient::Zinc),
            sodium_mg: f(Nutrient::Sodium),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, &T)> + '_ {
        Nutrient::ALL.into_iter().map(move |n| (n, self.get(n)))
    }
}

impl Micronutrients {
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| *v == 0.0)
    }

    /// Keeps only the amounts a supplement can carry.
    pub fn supplement_subset(&self) -> Self {
        Self::from_fn(|n| {
            if Nutrient::SUPPLEMENT_TRACKED.contains(&n) {
                *self.get(n)
            } else {
                0.0
            }
        })
    }
}

/// Reads the 14 columns named by [`Nutrient::key`].
impl<'r> FromRow<'r, PgRow> for Micronutrients {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let mut m = Micronutrients::default();
        for n in Nutrient::ALL {
            *m.get_mut(n) = row.try_get(n.key())?;
        }
        Ok(m)
    }
}
