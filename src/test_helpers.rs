//! Shared test utilities for the salad-builder test suite.
//!
//! Builders for catalog ingredients with just enough data for a test, plus a
//! couple of selection extractors.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let s = Selection::new().add_ingredient(ingredient("rice", Category::Grains), None);
//! assert_eq!(ids(&s), vec!["rice"]);
//! ```

use std::sync::Arc;

use crate::selection::Selection;
use crate::types::{Category, Ingredient, NutritionFacts};

// =========================================================================
// Ingredient builders
// =========================================================================

/// Per-100g facts with every field set, fiber included.
///
/// energyKj 400, energyKcal 100, fat 10, saturatedFat 2, carbohydrates 20,
/// sugars 3, protein 6, salt 1, fiber 4.
pub fn sample_facts() -> NutritionFacts {
    NutritionFacts {
        energy_kj: 400.0,
        energy_kcal: 100.0,
        fat: 10.0,
        saturated_fat: 2.0,
        carbohydrates: 20.0,
        sugars: 3.0,
        protein: 6.0,
        salt: 1.0,
        fiber: Some(4.0),
    }
}

/// Ingredient named after its id, with the given facts.
pub fn ingredient_with_facts(id: &str, category: Category, facts: NutritionFacts) -> Arc<Ingredient> {
    Arc::new(Ingredient {
        id: id.to_string(),
        name: id.to_string(),
        slogan: String::new(),
        category,
        image_url: String::new(),
        nutrition_per_100g: facts,
        nutri_score: None,
        climate_footprint: None,
        is_vegan: false,
        is_vegetarian: false,
        is_warmish: false,
    })
}

/// Ingredient whose only non-zero fact is energy in kcal.
pub fn ingredient_with_kcal(id: &str, category: Category, kcal: f64) -> Arc<Ingredient> {
    ingredient_with_facts(
        id,
        category,
        NutritionFacts {
            energy_kcal: kcal,
            ..NutritionFacts::default()
        },
    )
}

/// Ingredient with [`sample_facts`].
pub fn ingredient(id: &str, category: Category) -> Arc<Ingredient> {
    ingredient_with_facts(id, category, sample_facts())
}

// =========================================================================
// Selection extractors
// =========================================================================

/// Entry ids in selection order.
pub fn ids(selection: &Selection) -> Vec<&str> {
    selection.iter().map(|s| s.id()).collect()
}

/// A small catalog document in the upstream JSON format.
pub const CATALOG_JSON: &str = r#"[
  {
    "id": "ruccola", "name": "Ruccola", "slogan": "Pepprig", "category": "bases",
    "nutritionPer100g": { "energyKj": 105, "energyKcal": 25, "fat": 0.7, "saturatedFat": 0.1,
      "carbohydrates": 2.1, "sugars": 2.0, "protein": 2.6, "salt": 0.07, "fiber": 1.6 },
    "isVegan": true, "isVegetarian": true
  },
  {
    "id": "quinoa", "name": "Quinoa", "slogan": "Fullkorn", "category": "grains",
    "nutritionPer100g": { "energyKj": 500, "energyKcal": 120, "fat": 1.9, "saturatedFat": 0.2,
      "carbohydrates": 21.3, "sugars": 0.9, "protein": 4.4, "salt": 0.01, "fiber": 2.8 },
    "isVegan": true, "isVegetarian": true
  },
  {
    "id": "kyckling", "name": "Kyckling", "slogan": "Grillad och kryddig", "category": "proteins",
    "nutritionPer100g": { "energyKj": 640, "energyKcal": 153, "fat": 4.1, "saturatedFat": 1.2,
      "carbohydrates": 0.5, "sugars": 0.3, "protein": 28, "salt": 1.1 },
    "nutriScore": "A", "climateFoodprint": 2.4, "isWarmish": true
  },
  {
    "id": "fetaost", "name": "Fetaost", "slogan": "Krämig", "category": "cheese",
    "nutritionPer100g": { "energyKj": 1100, "energyKcal": 265, "fat": 21, "saturatedFat": 15,
      "carbohydrates": 1.5, "sugars": 1.5, "protein": 17, "salt": 2.7 },
    "isVegetarian": true
  },
  {
    "id": "caesardressing", "name": "Caesardressing", "slogan": "Klassisk", "category": "dressings",
    "nutritionPer100g": { "energyKj": 1800, "energyKcal": 430, "fat": 45, "saturatedFat": 4,
      "carbohydrates": 4, "sugars": 3, "protein": 2, "salt": 2.2 }
  }
]"#;
