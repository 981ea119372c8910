//! Ingredient catalog loading and lookup.
//!
//! The catalog is the read-only list of ingredients a salad can be built
//! from. It is supplied in full at startup as a JSON or TOML file and never
//! changes afterwards. Ingredients are stored as `Arc<Ingredient>` so a
//! selection can hold on to them without copying.
//!
//! ## Accepted formats
//!
//! JSON, either a bare array or an object with an `ingredients` array:
//!
//! ```json
//! [{ "id": "ruccola", "name": "Ruccola", "category": "bases",
//!    "nutritionPer100g": { "energyKj": 105, "energyKcal": 25, ... } }]
//! ```
//!
//! TOML, as an array of tables (chosen when the file ends in `.toml`):
//!
//! ```toml
//! [[ingredients]]
//! id = "ruccola"
//! name = "Ruccola"
//! category = "bases"
//! nutritionPer100g = { energyKj = 105, energyKcal = 25, ... }
//! ```
//!
//! ## Validation
//!
//! Every id must be non-empty and unique, and every nutrition value finite
//! and non-negative. A catalog that fails any check is rejected as a whole.

use crate::types::{Category, Ingredient};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("ingredient #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate ingredient id '{0}'")]
    DuplicateId(String),
    #[error("ingredient '{id}' has invalid {field}: {value}")]
    InvalidNutrition {
        id: String,
        field: &'static str,
        value: f64,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Ingredient>),
    Wrapped { ingredients: Vec<Ingredient> },
}

impl CatalogDocument {
    fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            CatalogDocument::List(items) | CatalogDocument::Wrapped { ingredients: items } => items,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCatalog {
    #[serde(default)]
    ingredients: Vec<Ingredient>,
}

/// The validated, immutable ingredient catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ingredients: Vec<Arc<Ingredient>>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from ingredients, validating ids and nutrition values.
    pub fn new(ingredients: Vec<Ingredient>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(ingredients.len());
        for (i, ingredient) in ingredients.iter().enumerate() {
            if ingredient.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index: i });
            }
            if index.insert(ingredient.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(ingredient.id.clone()));
            }
            validate_nutrition(ingredient)?;
        }
        Ok(Self {
            ingredients: ingredients.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(content)?;
        Self::new(document.into_ingredients())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let document: TomlCatalog = toml::from_str(content)?;
        Self::new(document.ingredients)
    }

    /// Load a catalog file; `.toml` files are read as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let catalog = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        info!(path = %path.display(), ingredients = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Ingredient>> {
        self.index.get(id).map(|&i| &self.ingredients[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ingredient>> {
        self.ingredients.iter()
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Ingredients in `category` (all when `None`) whose name or slogan
    /// contains `query`, case-insensitively. An empty query matches all.
    /// Catalog order is preserved.
    pub fn filter(&self, category: Option<Category>, query: &str) -> Vec<&Arc<Ingredient>> {
        let needle = query.to_lowercase();
        self.ingredients
            .iter()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .filter(|i| {
                needle.is_empty()
                    || i.name.to_lowercase().contains(&needle)
                    || i.slogan.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Number of ingredients per category, in category display order.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.ingredients.iter().filter(|i| i.category == c).count()))
            .collect()
    }
}

fn validate_nutrition(ingredient: &Ingredient) -> Result<(), CatalogError> {
    let facts = &ingredient.nutrition_per_100g;
    let mut fields = facts.fields();
    if let Some(score) = ingredient.climate_footprint {
        fields.push(("climateFootprint", score));
    }
    match fields
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
    {
        Some((field, value)) => Err(CatalogError::InvalidNutrition {
            id: ingredient.id.clone(),
            field,
            value,
        }),
        None => Ok(()),
    }
}
