//! Nutrition aggregation.
//!
//! Everything here is a pure function of its arguments: nothing is cached,
//! so callers recompute the total from the current selection snapshot each
//! time they render. Catalog facts are per 100 g, so an entry of `q` grams
//! contributes `fact * q / 100` of every nutrient.
//!
//! ## Daily values
//!
//! Percentages are measured against a fixed reference intake for a
//! 2000 kcal diet:
//!
//! | Nutrient | Reference |
//! |----------|-----------|
//! | energy | 2000 kcal |
//! | fat | 70 g |
//! | saturated fat | 20 g |
//! | carbohydrates | 260 g |
//! | sugars | 90 g |
//! | protein | 50 g |
//! | salt | 6 g |
//! | fiber | 30 g |
//!
//! Percentages are not capped; a big salad can exceed 100 %.

use crate::selection::SelectedIngredient;
use crate::types::NutritionFacts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summed nutrition of a selection, in absolute grams / kcal / kJ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotal {
    pub total_weight: f64,
    pub energy_kj: f64,
    pub energy_kcal: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub carbohydrates: f64,
    pub sugars: f64,
    pub protein: f64,
    pub salt: f64,
    pub fiber: f64,
}

impl NutritionTotal {
    pub fn value(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::EnergyKcal => self.energy_kcal,
            Nutrient::Fat => self.fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::Sugars => self.sugars,
            Nutrient::Protein => self.protein,
            Nutrient::Salt => self.salt,
            Nutrient::Fiber => self.fiber,
        }
    }
}

/// Fold selected ingredients into a total. Empty input gives all zeros.
pub fn calculate_nutrition<'a, I>(selected: I) -> NutritionTotal
where
    I: IntoIterator<Item = &'a SelectedIngredient>,
{
    selected
        .into_iter()
        .fold(NutritionTotal::default(), |acc, entry| {
            let quantity = entry.quantity;
            let multiplier = quantity / 100.0;
            let facts = &entry.ingredient.nutrition_per_100g;
            NutritionTotal {
                total_weight: acc.total_weight + quantity,
                energy_kj: acc.energy_kj + facts.energy_kj * multiplier,
                energy_kcal: acc.energy_kcal + facts.energy_kcal * multiplier,
                fat: acc.fat + facts.fat * multiplier,
                saturated_fat: acc.saturated_fat + facts.saturated_fat * multiplier,
                carbohydrates: acc.carbohydrates + facts.carbohydrates * multiplier,
                sugars: acc.sugars + facts.sugars * multiplier,
                protein: acc.protein + facts.protein * multiplier,
                salt: acc.salt + facts.salt * multiplier,
                fiber: acc.fiber + facts.fiber.unwrap_or(0.0) * multiplier,
            }
        })
}

/// Rescale a total to a per-100 g basis.
///
/// A zero-weight total has no meaningful density and yields all-zero facts
/// (fiber included, as `Some(0.0)`).
pub fn nutrition_per_100g(total: &NutritionTotal) -> NutritionFacts {
    if total.total_weight == 0.0 {
        return NutritionFacts {
            fiber: Some(0.0),
            ..NutritionFacts::default()
        };
    }
    let multiplier = 100.0 / total.total_weight;
    NutritionFacts {
        energy_kj: total.energy_kj * multiplier,
        energy_kcal: total.energy_kcal * multiplier,
        fat: total.fat * multiplier,
        saturated_fat: total.saturated_fat * multiplier,
        carbohydrates: total.carbohydrates * multiplier,
        sugars: total.sugars * multiplier,
        protein: total.protein * multiplier,
        salt: total.salt * multiplier,
        fiber: Some(total.fiber * multiplier),
    }
}

// =============================================================================
// Daily values
// =============================================================================

/// A nutrient that has a daily reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nutrient {
    EnergyKcal,
    Fat,
    SaturatedFat,
    Carbohydrates,
    Sugars,
    Protein,
    Salt,
    Fiber,
}

impl Nutrient {
    pub const ALL: [Nutrient; 8] = [
        Nutrient::EnergyKcal,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::Carbohydrates,
        Nutrient::Sugars,
        Nutrient::Protein,
        Nutrient::Salt,
        Nutrient::Fiber,
    ];

    /// camelCase key, as used in catalog files and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::EnergyKcal => "energyKcal",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturatedFat",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Sugars => "sugars",
            Nutrient::Protein => "protein",
            Nutrient::Salt => "salt",
            Nutrient::Fiber => "fiber",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::EnergyKcal => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown nutrient '{0}'")]
pub struct UnknownNutrient(pub String);

impl FromStr for Nutrient {
    type Err = UnknownNutrient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nutrient::ALL
            .into_iter()
            .find(|n| n.key() == s)
            .ok_or_else(|| UnknownNutrient(s.to_string()))
    }
}

/// Reference daily intake per nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DailyValues {
    pub energy_kcal: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub carbohydrates: f64,
    pub sugars: f64,
    pub protein: f64,
    pub salt: f64,
    pub fiber: f64,
}

impl Default for DailyValues {
    fn default() -> Self {
        Self {
            energy_kcal: 2000.0,
            fat: 70.0,
            saturated_fat: 20.0,
            carbohydrates: 260.0,
            sugars: 90.0,
            protein: 50.0,
            salt: 6.0,
            fiber: 30.0,
        }
    }
}

impl DailyValues {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::EnergyKcal => self.energy_kcal,
            Nutrient::Fat => self.fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::Sugars => self.sugars,
            Nutrient::Protein => self.protein,
            Nutrient::Salt => self.salt,
            Nutrient::Fiber => self.fiber,
        }
    }

    /// `value` as a percentage of this table's reference for `nutrient`.
    pub fn percent_of(&self, value: f64, nutrient: Nutrient) -> f64 {
        value / self.get(nutrient) * 100.0
    }
}

/// `value` as a percentage of the fixed daily reference for `nutrient`.
pub fn percent_of_daily(value: f64, nutrient: Nutrient) -> f64 {
    DailyValues::default().percent_of(value, nutrient)
}

/// One of the three headline macros with its share of the daily value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroShare {
    pub nutrient: Nutrient,
    pub grams: f64,
    pub percent_of_daily: f64,
    /// Progress-bar fill, `percent_of_daily` capped to 0..=100.
    pub fill_percent: f64,
}

/// Protein, carbohydrates and fat, in that order.
pub fn macro_breakdown(total: &NutritionTotal, daily: &DailyValues) -> [MacroShare; 3] {
    [Nutrient::Protein, Nutrient::Carbohydrates, Nutrient::Fat].map(|nutrient| {
        let grams = total.value(nutrient);
        let percent = daily.percent_of(grams, nutrient);
        MacroShare {
            nutrient,
            grams,
            percent_of_daily: percent,
            fill_percent: percent.clamp(0.0, 100.0),
        }
    })
}

// =============================================================================
// Display
// =============================================================================

/// Fixed-point formatting with `decimals` digits after the point.
///
/// Uses Rust's float formatting: the exact binary value is rounded, and exact
/// ties round to even (`2.5` → `"2"`, `0.25` → `"0.2"`).
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// [`format_number`] with the default single decimal.
pub fn format_number_default(value: f64) -> String {
    format_number(value, 1)
}
