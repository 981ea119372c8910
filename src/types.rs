//! Catalog record types shared by every module.
//!
//! These mirror the upstream ingredient data file: keys are camelCase on the
//! wire, and every nutrition value is expressed per 100 grams of the
//! ingredient. The catalog is read-only once loaded, so ingredients are
//! handed around as `Arc<Ingredient>` and never mutated.

use crate::nutrition::Nutrient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ingredient category. Drives the spoon → gram conversion and the catalog tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bases,
    Grains,
    Proteins,
    Vegetables,
    Cheese,
    Fruits,
    Toppings,
    Dressings,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 8] = [
        Category::Bases,
        Category::Grains,
        Category::Proteins,
        Category::Vegetables,
        Category::Cheese,
        Category::Fruits,
        Category::Toppings,
        Category::Dressings,
    ];

    /// Machine key, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Category::Bases => "bases",
            Category::Grains => "grains",
            Category::Proteins => "proteins",
            Category::Vegetables => "vegetables",
            Category::Cheese => "cheese",
            Category::Fruits => "fruits",
            Category::Toppings => "toppings",
            Category::Dressings => "dressings",
        }
    }

    /// Tab label as shown in the salad bar.
    pub fn label(self) -> &'static str {
        match self {
            Category::Bases => "Baser",
            Category::Grains => "Kolhydrater",
            Category::Proteins => "Protein",
            Category::Vegetables => "Grönsaker",
            Category::Cheese => "Ost",
            Category::Fruits => "Frukt",
            Category::Toppings => "Toppings",
            Category::Dressings => "Dressing",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Bases => "🥬",
            Category::Grains => "🍚",
            Category::Proteins => "🍗",
            Category::Vegetables => "🥒",
            Category::Cheese => "🧀",
            Category::Fruits => "🥭",
            Category::Toppings => "🥜",
            Category::Dressings => "🥄",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: bases, grains, proteins, vegetables, cheese, fruits, toppings, dressings)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Nutri-Score grade printed on the catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutriScore {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for NutriScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grade = match self {
            NutriScore::A => "A",
            NutriScore::B => "B",
            NutriScore::C => "C",
            NutriScore::D => "D",
            NutriScore::E => "E",
        };
        f.write_str(grade)
    }
}

/// Nutrition facts per 100 g of an ingredient.
///
/// All values are non-negative. `fiber` is optional upstream; a missing value
/// counts as zero wherever facts are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFacts {
    pub energy_kj: f64,
    pub energy_kcal: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub carbohydrates: f64,
    pub sugars: f64,
    pub protein: f64,
    pub salt: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

impl NutritionFacts {
    /// The value for `nutrient`; missing fiber reads as zero.
    pub fn value(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::EnergyKcal => self.energy_kcal,
            Nutrient::Fat => self.fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::Sugars => self.sugars,
            Nutrient::Protein => self.protein,
            Nutrient::Salt => self.salt,
            Nutrient::Fiber => self.fiber.unwrap_or(0.0),
        }
    }

    /// Every field as `(camelCase key, value)`, fiber included when present.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        let mut fields = vec![
            ("energyKj", self.energy_kj),
            ("energyKcal", self.energy_kcal),
            ("fat", self.fat),
            ("saturatedFat", self.saturated_fat),
            ("carbohydrates", self.carbohydrates),
            ("sugars", self.sugars),
            ("protein", self.protein),
            ("salt", self.salt),
        ];
        if let Some(fiber) = self.fiber {
            fields.push(("fiber", fiber));
        }
        fields
    }
}

/// A catalog ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Short marketing line shown above the name; searched alongside it.
    #[serde(default)]
    pub slogan: String,
    pub category: Category,
    #[serde(default)]
    pub image_url: String,
    pub nutrition_per_100g: NutritionFacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutri_score: Option<NutriScore>,
    /// kg CO2e per kg. Upstream data spells the key `climateFoodprint`.
    #[serde(
        default,
        alias = "climateFoodprint",
        skip_serializing_if = "Option::is_none"
    )]
    pub climate_footprint: Option<f64>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_warmish: bool,
}
