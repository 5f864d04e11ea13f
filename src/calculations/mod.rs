//! Body-metric calculations: energy, macros, hydration and micronutrient RDAs.
//!
//! Everything in here is pure. Inputs are assumed validated by the caller;
//! out-of-range numbers are computed through rather than rejected.

pub mod metabolic;
pub mod rda;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use metabolic::{bmr, calorie_goal, derive_targets, tdee, BodyMetrics, DerivedTargets};
pub use rda::rda_targets;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Lenient parse for values read back from storage.
            pub fn from_stored(value: &str) -> Self {
                value.parse().unwrap_or_else(|_| {
                    tracing::debug!(value, kind = $kind, "unrecognised stored value, using default");
                    $name::$default
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant { kind: $kind, value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Unrecognised values behave as `Other` (average of both formulas).
    Gender, "gender", default = Other,
    { Male => "male", Female => "female", Other => "other" }
}

closed_enum! {
    /// Ordered from least to most active. Unrecognised values behave as `Sedentary`.
    ActivityLevel, "activity level", default = Sedentary,
    {
        Sedentary => "sedentary",
        LightlyActive => "lightly_active",
        ModeratelyActive => "moderately_active",
        VeryActive => "very_active",
        ExtraActive => "extra_active",
    }
}

closed_enum! {
    /// Unrecognised values behave as `Maintain`.
    Goal, "goal", default = Maintain,
    { Lose => "lose", Maintain => "maintain", Gain => "gain" }
}

/// Half-to-even rounding to a whole number, matching how targets were
/// always rounded (2.5 -> 2, 3.5 -> 4).
pub fn round_whole(x: f64) -> i32 {
    x.round_ties_even() as i32
}

/// Rounds to one decimal place using the shortest decimal form of `x`
/// (0.05 -> 0.1, 0.15 -> 0.1, 0.35 -> 0.3). Scaling by ten first must not be
/// used: `0.05 * 10.0` is exactly 0.5 and would round to zero.
pub fn round_tenth(x: f64) -> f64 {
    format!("{x:.1}").parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(
            "moderately_active".parse::<ActivityLevel>(),
            Ok(ActivityLevel::ModeratelyActive)
        );
        assert_eq!("gain".parse::<Goal>(), Ok(Goal::Gain));
        assert!("couch".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn stored_values_fall_back_to_documented_defaults() {
        assert_eq!(Gender::from_stored("nonbinary"), Gender::Other);
        assert_eq!(ActivityLevel::from_stored(""), ActivityLevel::Sedentary);
        assert_eq!(Goal::from_stored("bulk"), Goal::Maintain);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ActivityLevel::ExtraActive).unwrap();
        assert_eq!(json, "\"extra_active\"");
        let g: Goal = serde_json::from_str("\"lose\"").unwrap();
        assert_eq!(g, Goal::Lose);
        assert!(serde_json::from_str::<Gender>("\"robot\"").is_err());
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_whole(2.5), 2);
        assert_eq!(round_whole(3.5), 4);
        assert_eq!(round_whole(-11.11), -11);
        assert_eq!(round_tenth(1.26), 1.3);
        assert_eq!(round_tenth(0.04), 0.0);
    }

    #[test]
    fn tenth_rounding_follows_decimal_ties() {
        assert_eq!(round_tenth(0.05), 0.1);
        assert_eq!(round_tenth(0.15), 0.1);
        assert_eq!(round_tenth(0.35), 0.3);
        assert_eq!(round_tenth(1.05), 1.1);
        assert_eq!(round_tenth(2.45), 2.5);
        assert_eq!(round_tenth(-0.15), -0.1);
        assert_eq!(round_tenth(12.0), 12.0);
    }
}
