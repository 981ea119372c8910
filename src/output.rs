//! CLI output formatting for catalogs, selections and nutrition reports.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and display name; the
//! machine id and unit details follow as secondary context. This makes the
//! output readable as a salad receipt while still showing the ids a script
//! needs to refer back to an ingredient.
//!
//! # Output Format
//!
//! ## Catalog
//!
//! ```text
//! 🥬 Baser (1)
//!     001 Ruccola [ruccola] 25 kcal/100g (vegan)
//! 🍗 Protein (1)
//!     001 Kyckling [kyckling] 153 kcal/100g (warmish, Nutri-Score A, 2.4 kg CO2e/kg)
//! ```
//!
//! ## Selection + nutrition
//!
//! ```text
//! Salad (2 ingredients)
//!     001 Ruccola [ruccola] 2 sk = 30 g, 8 kcal
//!     002 Kyckling [kyckling] 90 g, 138 kcal
//!
//! Nutrition
//!     Energy: 145 kcal (7% of daily), 606 kJ
//!     Total weight: 120 g
//!     Protein: 26.0 g (52%)
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O. [`NutritionReport`] is the
//! serializable form used by `--json`.

use crate::catalog::Catalog;
use crate::nutrition::{
    DailyValues, MacroShare, Nutrient, NutritionTotal, calculate_nutrition, format_number,
    macro_breakdown, nutrition_per_100g,
};
use crate::selection::{InputMode, Selection};
use crate::types::{Category, Ingredient, NutritionFacts};
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// Report model
// ============================================================================

/// One selected ingredient as shown in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub input_mode: InputMode,
    /// Present only while the entry is edited in spoons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoon_count: Option<u64>,
    /// Grams.
    pub quantity: f64,
    pub energy_kcal: f64,
}

/// A nutrient amount with its share of the daily reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyShare {
    pub nutrient: Nutrient,
    pub amount: f64,
    pub percent_of_daily: f64,
}

/// Everything a host needs to render the salad and its nutrition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReport {
    pub lines: Vec<ReportLine>,
    pub total: NutritionTotal,
    pub per_100g: NutritionFacts,
    pub daily: Vec<DailyShare>,
    pub macros: [MacroShare; 3],
}

impl NutritionReport {
    pub fn build(selection: &Selection, daily_values: &DailyValues) -> Self {
        let lines = selection
            .iter()
            .map(|entry| ReportLine {
                id: entry.id().to_string(),
                name: entry.ingredient.name.clone(),
                category: entry.ingredient.category,
                input_mode: entry.input_mode,
                spoon_count: (entry.input_mode == InputMode::Spoons).then_some(entry.spoon_count),
                quantity: entry.quantity,
                energy_kcal: entry.contribution().energy_kcal,
            })
            .collect();
        let total = calculate_nutrition(selection);
        let daily = Nutrient::ALL
            .into_iter()
            .map(|nutrient| {
                let amount = total.value(nutrient);
                DailyShare {
                    nutrient,
                    amount,
                    percent_of_daily: daily_values.percent_of(amount, nutrient),
                }
            })
            .collect();
        Self {
            lines,
            per_100g: nutrition_per_100g(&total),
            macros: macro_breakdown(&total, daily_values),
            total,
            daily,
        }
    }

    pub fn share(&self, nutrient: Nutrient) -> Option<&DailyShare> {
        self.daily.iter().find(|d| d.nutrient == nutrient)
    }
}

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human label for a nutrient line.
fn nutrient_label(nutrient: Nutrient) -> &'static str {
    match nutrient {
        Nutrient::EnergyKcal => "Energy",
        Nutrient::Fat => "Fat",
        Nutrient::SaturatedFat => "Saturated fat",
        Nutrient::Carbohydrates => "Carbohydrates",
        Nutrient::Sugars => "Sugars",
        Nutrient::Protein => "Protein",
        Nutrient::Salt => "Salt",
        Nutrient::Fiber => "Fiber",
    }
}

/// Catalog entry: index, name, id, energy density, then dietary flags,
/// Nutri-Score and climate footprint when known.
///
/// ```text
/// 001 Kyckling [kyckling] 153 kcal/100g (warmish, Nutri-Score A, 2.4 kg CO2e/kg)
/// ```
fn ingredient_line(index: usize, ingredient: &Ingredient) -> String {
    let mut flags = Vec::new();
    if ingredient.is_vegan {
        flags.push("vegan".to_string());
    } else if ingredient.is_vegetarian {
        flags.push("vegetarian".to_string());
    }
    if ingredient.is_warmish {
        flags.push("warmish".to_string());
    }
    if let Some(score) = ingredient.nutri_score {
        flags.push(format!("Nutri-Score {score}"));
    }
    if let Some(footprint) = ingredient.climate_footprint {
        flags.push(format!("{} kg CO2e/kg", format_number(footprint, 1)));
    }
    let mut line = format!(
        "{} {} [{}] {} kcal/100g",
        format_index(index),
        ingredient.name,
        ingredient.id,
        format_number(ingredient.nutrition_per_100g.energy_kcal, 0)
    );
    if !flags.is_empty() {
        line.push_str(&format!(" ({})", flags.join(", ")));
    }
    line
}

// ============================================================================
// Catalog
// ============================================================================

/// Format catalog ingredients grouped under category headers.
///
/// Categories with no matching ingredient are skipped. An empty input gives
/// a single "no ingredients" line.
pub fn format_catalog(ingredients: &[&Arc<Ingredient>]) -> Vec<String> {
    if ingredients.is_empty() {
        return vec!["No ingredients found.".to_string()];
    }
    let mut lines = Vec::new();
    for category in Category::ALL {
        let members: Vec<_> = ingredients
            .iter()
            .filter(|i| i.category == category)
            .collect();
        if members.is_empty() {
            continue;
        }
        lines.push(format!(
            "{} {} ({})",
            category.icon(),
            category.label(),
            members.len()
        ));
        for (i, ingredient) in members.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), ingredient_line(i + 1, ingredient)));
        }
    }
    lines
}

/// Print catalog output to stdout.
pub fn print_catalog(ingredients: &[&Arc<Ingredient>]) {
    for line in format_catalog(ingredients) {
        println!("{}", line);
    }
}

/// One-line catalog summary used by `check`.
pub fn format_catalog_summary(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!("Catalog: {} ingredients", catalog.len())];
    for (category, count) in catalog.category_counts() {
        lines.push(format!("{}{} {}: {}", indent(1), category.icon(), category.label(), count));
    }
    lines
}

// ============================================================================
// Selection + nutrition
// ============================================================================

/// Format the selected ingredients with their amounts and energy.
pub fn format_selection(report: &NutritionReport) -> Vec<String> {
    if report.lines.is_empty() {
        return vec!["Salad is empty".to_string()];
    }
    let count = report.lines.len();
    let noun = if count == 1 { "ingredient" } else { "ingredients" };
    let mut lines = vec![format!("Salad ({count} {noun})")];
    for (i, line) in report.lines.iter().enumerate() {
        let amount = match line.spoon_count {
            Some(spoons) => format!("{spoons} sk = {} g", format_number(line.quantity, 0)),
            None => format!("{} g", format_number(line.quantity, 0)),
        };
        lines.push(format!(
            "{}{} {} [{}] {}, {} kcal",
            indent(1),
            format_index(i + 1),
            line.name,
            line.id,
            amount,
            format_number(line.energy_kcal, 0)
        ));
    }
    lines
}

/// Format totals, percent of daily value and the per-100g density.
///
/// `decimals` applies to gram amounts; energy and percentages are whole numbers.
pub fn format_nutrition(report: &NutritionReport, decimals: usize) -> Vec<String> {
    let total = &report.total;
    let mut lines = vec!["Nutrition".to_string()];

    let energy_pct = report
        .share(Nutrient::EnergyKcal)
        .map(|s| s.percent_of_daily)
        .unwrap_or(0.0);
    lines.push(format!(
        "{}Energy: {} kcal ({}% of daily), {} kJ",
        indent(1),
        format_number(total.energy_kcal, 0),
        format_number(energy_pct, 0),
        format_number(total.energy_kj, 0)
    ));
    lines.push(format!(
        "{}Total weight: {} g",
        indent(1),
        format_number(total.total_weight, 0)
    ));
    for share in report
        .daily
        .iter()
        .filter(|s| s.nutrient != Nutrient::EnergyKcal)
    {
        lines.push(format!(
            "{}{}: {} g ({}%)",
            indent(1),
            nutrient_label(share.nutrient),
            format_number(share.amount, decimals),
            format_number(share.percent_of_daily, 0)
        ));
    }

    if total.total_weight > 0.0 {
        let per_100g = &report.per_100g;
        lines.push(String::new());
        lines.push("Per 100 g".to_string());
        lines.push(format!(
            "{}Energy: {} kcal, {} kJ",
            indent(1),
            format_number(per_100g.energy_kcal, 0),
            format_number(per_100g.energy_kj, 0)
        ));
        for nutrient in Nutrient::ALL
            .into_iter()
            .filter(|n| *n != Nutrient::EnergyKcal)
        {
            lines.push(format!(
                "{}{}: {} g",
                indent(1),
                nutrient_label(nutrient),
                format_number(per_100g.value(nutrient), decimals)
            ));
        }
    }
    lines
}

/// Full text report: selection followed by nutrition.
pub fn format_report(report: &NutritionReport, decimals: usize) -> Vec<String> {
    let mut lines = format_selection(report);
    lines.push(String::new());
    lines.extend(format_nutrition(report, decimals));
    lines
}

/// Print the text report to stdout.
pub fn print_report(report: &NutritionReport, decimals: usize) {
    for line in format_report(report, decimals) {
        println!("{}", line);
    }
}

/// Print the report as pretty JSON to stdout.
pub fn print_report_json(report: &NutritionReport) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
