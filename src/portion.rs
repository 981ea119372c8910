//! Spoon ↔ gram conversion.
//!
//! A "spoon" is a serving scoop whose weight depends on how dense the
//! ingredient category is: a spoon of leaves weighs far less than a spoon
//! of grains. Quantities are always stored in grams; spoons are a view over
//! them with a per-category factor.
//!
//! ## Rounding
//!
//! Converting grams back to spoons rounds half up (`floor(x + 0.5)`), so
//! 47 g of grains (40 g/spoon) becomes 1 spoon and 60 g becomes 2. The
//! conversion is lossy: after a grams → spoons switch the stored
//! grams snap to the whole-spoon value.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spoons given to a freshly added ingredient.
pub const DEFAULT_SPOONS: u32 = 2;

/// Grams per spoon for each category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpoonTable {
    pub bases: f64,
    pub grains: f64,
    pub proteins: f64,
    pub vegetables: f64,
    pub cheese: f64,
    pub fruits: f64,
    pub toppings: f64,
    pub dressings: f64,
}

impl Default for SpoonTable {
    fn default() -> Self {
        Self {
            bases: 15.0,
            grains: 40.0,
            proteins: 30.0,
            vegetables: 25.0,
            cheese: 20.0,
            fruits: 30.0,
            toppings: 10.0,
            dressings: 15.0,
        }
    }
}

impl SpoonTable {
    pub fn grams_per_spoon(&self, category: Category) -> f64 {
        match category {
            Category::Bases => self.bases,
            Category::Grains => self.grains,
            Category::Proteins => self.proteins,
            Category::Vegetables => self.vegetables,
            Category::Cheese => self.cheese,
            Category::Fruits => self.fruits,
            Category::Toppings => self.toppings,
            Category::Dressings => self.dressings,
        }
    }
}

/// Grams per spoon from the stock table.
pub fn grams_per_spoon(category: Category) -> f64 {
    SpoonTable::default().grams_per_spoon(category)
}

/// Whole spoons closest to `grams`, rounding half up. Never negative.
///
/// A non-positive or non-finite `grams_per_spoon` yields zero spoons.
/// Returns `None` when the count does not fit in a `u64`.
pub fn spoons_for_grams(grams: f64, grams_per_spoon: f64) -> Option<u64> {
    if grams_per_spoon.is_nan() || grams_per_spoon <= 0.0 || !grams.is_finite() {
        return Some(0);
    }
    let spoons = (grams / grams_per_spoon + 0.5).floor();
    if spoons <= 0.0 {
        Some(0)
    } else if spoons >= u64::MAX as f64 {
        None
    } else {
        Some(spoons as u64)
    }
}

/// Clamp a signed spoon count from the outside world to the valid range.
pub fn clamp_spoons(spoons: i64) -> u64 {
    spoons.max(0) as u64
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortionError {
    #[error("grams per spoon for {category} must be a positive number, got {value}")]
    InvalidSpoonWeight { category: Category, value: f64 },
}

/// Conversion settings a selection carries for its whole lifetime.
///
/// Fields are public so the struct can be filled from config, but a
/// selection only accepts a table that passes [`Portioning::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Portioning {
    /// Spoons given to a newly added ingredient.
    pub default_spoons: u32,
    pub grams_per_spoon: SpoonTable,
}

impl Default for Portioning {
    fn default() -> Self {
        Self {
            default_spoons: DEFAULT_SPOONS,
            grams_per_spoon: SpoonTable::default(),
        }
    }
}

impl Portioning {
    /// Every category must weigh a finite, positive number of grams per spoon.
    pub fn validate(&self) -> Result<(), PortionError> {
        for category in Category::ALL {
            let value = self.grams_per_spoon(category);
            if !value.is_finite() || value <= 0.0 {
                return Err(PortionError::InvalidSpoonWeight { category, value });
            }
        }
        Ok(())
    }

    pub fn grams_per_spoon(&self, category: Category) -> f64 {
        self.grams_per_spoon.grams_per_spoon(category)
    }

    /// Grams for `spoons` spoons of an ingredient in `category`.
    pub fn grams_for_spoons(&self, spoons: u64, category: Category) -> f64 {
        spoons as f64 * self.grams_per_spoon(category)
    }

    /// Snap `grams` to the nearest whole spoon: returns `(spoons, snapped_grams)`,
    /// or `None` when the spoon count would overflow.
    pub fn snap(&self, grams: f64, category: Category) -> Option<(u64, f64)> {
        let spoons = spoons_for_grams(grams, self.grams_per_spoon(category))?;
        Some((spoons, self.grams_for_spoons(spoons, category)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_table_values() {
        assert_eq!(grams_per_spoon(Category::Bases), 15.0);
        assert_eq!(grams_per_spoon(Category::Grains), 40.0);
        assert_eq!(grams_per_spoon(Category::Proteins), 30.0);
        assert_eq!(grams_per_spoon(Category::Vegetables), 25.0);
        assert_eq!(grams_per_spoon(Category::Cheese), 20.0);
        assert_eq!(grams_per_spoon(Category::Fruits), 30.0);
        assert_eq!(grams_per_spoon(Category::Toppings), 10.0);
        assert_eq!(grams_per_spoon(Category::Dressings), 15.0);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(spoons_for_grams(47.0, 40.0), Some(1));
        assert_eq!(spoons_for_grams(60.0, 40.0), Some(2));
        assert_eq!(spoons_for_grams(59.9, 40.0), Some(1));
        assert_eq!(spoons_for_grams(19.9, 40.0), Some(0));
        assert_eq!(spoons_for_grams(20.0, 40.0), Some(1));
    }

    #[test]
    fn large_amounts_keep_full_precision() {
        // well past u32::MAX spoons
        assert_eq!(spoons_for_grams(1e12, 10.0), Some(100_000_000_000));
        assert_eq!(
            Portioning::default().snap(1e12, Category::Toppings),
            Some((100_000_000_000, 1e12))
        );
    }

    #[test]
    fn unrepresentable_count_is_none() {
        assert_eq!(spoons_for_grams(1e30, 10.0), None);
        assert_eq!(Portioning::default().snap(f64::MAX, Category::Bases), None);
    }

    #[test]
    fn zero_and_degenerate_inputs() {
        assert_eq!(spoons_for_grams(0.0, 15.0), Some(0));
        assert_eq!(spoons_for_grams(-30.0, 15.0), Some(0));
        assert_eq!(spoons_for_grams(30.0, 0.0), Some(0));
        assert_eq!(spoons_for_grams(f64::NAN, 15.0), Some(0));
    }

    #[test]
    fn clamp_spoons_floors_at_zero() {
        assert_eq!(clamp_spoons(-3), 0);
        assert_eq!(clamp_spoons(4), 4);
        assert_eq!(clamp_spoons(i64::MAX), i64::MAX as u64);
    }

    #[test]
    fn snap_returns_whole_spoon_grams() {
        let portioning = Portioning::default();
        assert_eq!(portioning.snap(47.0, Category::Grains), Some((1, 40.0)));
        assert_eq!(portioning.snap(100.0, Category::Toppings), Some((10, 100.0)));
    }

    #[test]
    fn stock_portioning_is_valid() {
        assert_eq!(Portioning::default().validate(), Ok(()));
    }

    #[test]
    fn non_positive_spoon_weight_is_rejected() {
        let mut portioning = Portioning::default();
        portioning.grams_per_spoon.bases = -15.0;
        assert_eq!(
            portioning.validate(),
            Err(PortionError::InvalidSpoonWeight {
                category: Category::Bases,
                value: -15.0
            })
        );

        portioning.grams_per_spoon.bases = 15.0;
        portioning.grams_per_spoon.dressings = f64::INFINITY;
        let err = portioning.validate().unwrap_err();
        assert!(err.to_string().contains("dressings"));
    }

    #[test]
    fn default_portioning_gives_two_spoons() {
        let portioning = Portioning::default();
        assert_eq!(portioning.default_spoons, 2);
        assert_eq!(portioning.grams_for_spoons(2, Category::Proteins), 60.0);
    }
}
