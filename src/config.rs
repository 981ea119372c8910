//! Session configuration module.
//!
//! Handles loading, validating, and merging `salad.toml`. Stock defaults are
//! the reference tables the salad bar ships with; a user file only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [portions]
//! default_spoons = 2        # Spoons given to a newly added ingredient
//!
//! [portions.grams_per_spoon]
//! bases = 15.0              # Leafy greens are light
//! grains = 40.0             # Dense carbs
//! proteins = 30.0
//! vegetables = 25.0
//! cheese = 20.0
//! fruits = 30.0
//! toppings = 10.0           # Small portions
//! dressings = 15.0
//!
//! [daily_values]
//! energy_kcal = 2000.0      # Reference intake for a 2000 kcal diet
//! fat = 70.0
//! saturated_fat = 20.0
//! carbohydrates = 260.0
//! sugars = 90.0
//! protein = 50.0
//! salt = 6.0
//! fiber = 30.0
//!
//! [display]
//! decimals = 1              # Digits after the point in reports
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Bigger protein scoops, everything else stock
//! [portions.grams_per_spoon]
//! proteins = 35.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::nutrition::DailyValues;
use crate::portion::Portioning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "salad.toml";

/// Upper bound for `display.decimals`.
const MAX_DECIMALS: usize = 6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `salad.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaladConfig {
    /// Spoon sizes and the default spoon count.
    pub portions: Portioning,
    /// Reference intakes used for percent-of-daily figures.
    pub daily_values: DailyValues,
    /// Report formatting.
    pub display: DisplayConfig,
}

impl SaladConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.portions
            .validate()
            .map_err(|err| ConfigError::Validation(format!("portions: {err}")))?;
        let daily = &self.daily_values;
        let references = [
            ("energy_kcal", daily.energy_kcal),
            ("fat", daily.fat),
            ("saturated_fat", daily.saturated_fat),
            ("carbohydrates", daily.carbohydrates),
            ("sugars", daily.sugars),
            ("protein", daily.protein),
            ("salt", daily.salt),
            ("fiber", daily.fiber),
        ];
        if let Some((key, _)) = references
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "daily_values.{key} must be a positive number"
            )));
        }
        if self.display.decimals > MAX_DECIMALS {
            return Err(ConfigError::Validation(format!(
                "display.decimals must be 0-{MAX_DECIMALS}"
            )));
        }
        Ok(())
    }
}

/// Report formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Digits after the decimal point for gram values.
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimals: 1 }
    }
}

// =============================================================================
// Stock tables + salad.toml overrides
// =============================================================================

/// The stock spoon table, daily values and display settings as TOML.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SaladConfig::default()).expect("default config must serialize")
}

/// Lay the user's `overrides` over `defaults`.
///
/// Sections merge per key, so `[portions.grams_per_spoon] proteins = 35.0`
/// changes one spoon weight and keeps the other seven categories stock.
/// A scalar in `overrides` wins outright.
pub fn merge_toml(defaults: toml::Value, overrides: toml::Value) -> toml::Value {
    match (defaults, overrides) {
        (toml::Value::Table(mut section), toml::Value::Table(changes)) => {
            for (key, changed) in changes {
                let value = match section.remove(&key) {
                    Some(stock) => merge_toml(stock, changed),
                    None => changed,
                };
                section.insert(key, value);
            }
            toml::Value::Table(section)
        }
        (_, replacement) => replacement,
    }
}

/// Read `salad.toml` without interpreting it; `Ok(None)` when there is none.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Apply optional user overrides to the stock tables, then type-check
/// (unknown keys fail here) and range-check the result.
pub fn resolve_config(
    defaults: toml::Value,
    overrides: Option<toml::Value>,
) -> Result<SaladConfig, ConfigError> {
    let merged = match overrides {
        Some(user) => merge_toml(defaults, user),
        None => defaults,
    };
    let config: SaladConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Settings for a session: `path` over the stock tables, or the stock
/// tables alone when `path` does not exist.
pub fn load_config(path: &Path) -> Result<SaladConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Commented `salad.toml` listing every setting at its stock value, as
/// printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Salad Builder Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Portions
# ---------------------------------------------------------------------------
[portions]
# Spoons given to an ingredient when it is added to the salad.
default_spoons = 2

# Weight of one spoon, in grams, per ingredient category.
# Denser categories weigh more per spoon.
[portions.grams_per_spoon]
bases = 15.0
grains = 40.0
proteins = 30.0
vegetables = 25.0
cheese = 20.0
fruits = 30.0
toppings = 10.0
dressings = 15.0

# ---------------------------------------------------------------------------
# Daily reference intake (2000 kcal diet), used for "% of daily" figures
# ---------------------------------------------------------------------------
[daily_values]
energy_kcal = 2000.0
fat = 70.0
saturated_fat = 20.0
carbohydrates = 260.0
sugars = 90.0
protein = 50.0
salt = 6.0
fiber = 30.0

# ---------------------------------------------------------------------------
# Display
# ---------------------------------------------------------------------------
[display]
# Digits after the decimal point for gram values (0-6).
decimals = 1
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_reference_tables() {
        let config = SaladConfig::default();
        assert_eq!(config.portions.default_spoons, 2);
        assert_eq!(config.portions.grams_per_spoon(Category::Grains), 40.0);
        assert_eq!(config.daily_values.protein, 50.0);
        assert_eq!(config.display.decimals, 1);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[portions.grams_per_spoon]
proteins = 35.0
"#;
        let config: SaladConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.portions.grams_per_spoon(Category::Proteins), 35.0);
        // Default values preserved
        assert_eq!(config.portions.grams_per_spoon(Category::Bases), 15.0);
        assert_eq!(config.portions.default_spoons, 2);
        assert_eq!(config.daily_values.energy_kcal, 2000.0);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.daily_values.salt, 6.0);
        assert_eq!(config.portions.grams_per_spoon(Category::Toppings), 10.0);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
[portions]
default_spoons = 3

[daily_values]
protein = 60.0
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.portions.default_spoons, 3);
        assert_eq!(config.daily_values.protein, 60.0);
        // Unspecified values should be defaults
        assert_eq!(config.daily_values.fat, 70.0);
        assert_eq!(config.portions.grams_per_spoon(Category::Cheese), 20.0);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_nested_table_keeps_siblings() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[portions.grams_per_spoon]
grains = 50.0
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let table = merged
            .get("portions")
            .unwrap()
            .get("grams_per_spoon")
            .unwrap();
        assert_eq!(table.get("grains").unwrap().as_float(), Some(50.0));
        assert_eq!(table.get("bases").unwrap().as_float(), Some(15.0));
    }

    #[test]
    fn resolve_config_without_overrides_is_stock() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.portions, Portioning::default());
        assert_eq!(config.daily_values, DailyValues::default());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("decimals = 1").unwrap();
        let overlay: toml::Value = toml::from_str("decimals = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("decimals").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[portions]
default_spoon = 3
"#;
        let result: Result<SaladConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_category_key_rejected() {
        let toml_str = r#"
[portions.grams_per_spoon]
soups = 12.0
"#;
        let result: Result<SaladConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[colors]\nbackground = \"#fff\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SaladConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_spoon_weight() {
        let mut config = SaladConfig::default();
        config.portions.grams_per_spoon.fruits = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fruits"));
    }

    #[test]
    fn validate_negative_daily_value() {
        let mut config = SaladConfig::default();
        config.daily_values.salt = -6.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("daily_values.salt"));
    }

    #[test]
    fn validate_decimals_upper_bound() {
        let mut config = SaladConfig::default();
        config.display.decimals = 6;
        assert!(config.validate().is_ok());
        config.display.decimals = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[daily_values]\nprotein = 0.0\n").unwrap();
        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SaladConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.portions, Portioning::default());
        assert_eq!(config.daily_values, DailyValues::default());
        assert_eq!(config.display.decimals, 1);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("portions").is_some());
        assert!(val.get("daily_values").is_some());
        assert!(val.get("display").is_some());
    }
}
