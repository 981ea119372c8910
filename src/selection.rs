//! The selection store: which ingredients are in the salad, and how much.
//!
//! A [`Selection`] is an immutable snapshot. Every command takes `&self` and
//! returns the next snapshot; the previous one is left untouched, so a host
//! can keep old snapshots around for undo or diffing. Commands that change
//! nothing (unknown id, duplicate add) hand back a snapshot that shares
//! storage with the input, which [`Selection::same_snapshot`] detects in O(1).
//!
//! # Invariants
//!
//! - At most one entry per ingredient id. Adding a present id is a no-op and
//!   the first insertion wins.
//! - Quantities are grams and never negative; negative input clamps to zero.
//! - In [`InputMode::Spoons`], `quantity == spoon_count * grams_per_spoon`.
//!   In [`InputMode::Grams`], `quantity` is authoritative and `spoon_count`
//!   is left as it was until the entry is toggled back.
//! - The spoon table is validated on construction, so spoon-derived grams
//!   are never negative.
//!
//! # Example
//!
//! ```text
//! empty ── add(chicken) ──▶ [chicken 2 spoons = 60 g]
//!       ── grams(chicken, 47) ──▶ [chicken 47 g]
//!       ── toggle(chicken) ──▶ [chicken 2 spoons = 60 g]   (47 / 30 = 1.57 → 2)
//! ```

use crate::nutrition::{NutritionTotal, calculate_nutrition};
use crate::portion::{PortionError, Portioning, clamp_spoons};
use crate::types::Ingredient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Which unit the user is editing an entry in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Grams,
    Spoons,
}

impl InputMode {
    pub fn flipped(self) -> Self {
        match self {
            InputMode::Grams => InputMode::Spoons,
            InputMode::Spoons => InputMode::Grams,
        }
    }
}

/// One line of the salad.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedIngredient {
    pub ingredient: Arc<Ingredient>,
    /// Always grams, whatever the input mode.
    pub quantity: f64,
    pub input_mode: InputMode,
    /// Spoon count; only meaningful while `input_mode` is `Spoons`.
    pub spoon_count: u64,
}

impl SelectedIngredient {
    pub fn id(&self) -> &str {
        &self.ingredient.id
    }

    /// Nutrition this line alone contributes to the salad.
    pub fn contribution(&self) -> NutritionTotal {
        calculate_nutrition(std::slice::from_ref(self))
    }
}

/// A store command, for hosts that prefer dispatching values over calling
/// methods. [`Selection::apply`] maps each variant to the method of the
/// same name.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        ingredient: Arc<Ingredient>,
        quantity: Option<f64>,
    },
    Remove {
        id: String,
    },
    UpdateQuantity {
        id: String,
        quantity: f64,
    },
    UpdateSpoons {
        id: String,
        spoons: i64,
    },
    ToggleInputMode {
        id: String,
    },
    ToggleIngredient {
        ingredient: Arc<Ingredient>,
    },
    ClearAll,
}

/// Immutable snapshot of the selected ingredients, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    entries: Arc<Vec<SelectedIngredient>>,
    portioning: Portioning,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    /// Empty selection using the stock spoon table.
    pub fn new() -> Self {
        Self::empty(Portioning::default())
    }

    /// Empty selection converting spoons with `portioning`.
    ///
    /// Fails if any category has a non-positive or non-finite spoon weight.
    pub fn with_portioning(portioning: Portioning) -> Result<Self, PortionError> {
        portioning.validate()?;
        Ok(Self::empty(portioning))
    }

    fn empty(portioning: Portioning) -> Self {
        Self {
            entries: Arc::new(Vec::new()),
            portioning,
        }
    }

    pub fn portioning(&self) -> &Portioning {
        &self.portioning
    }

    pub fn entries(&self) -> &[SelectedIngredient] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectedIngredient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SelectedIngredient> {
        self.entries.iter().find(|s| s.id() == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// True when both snapshots share the same storage, i.e. one was derived
    /// from the other by a command that changed nothing.
    pub fn same_snapshot(&self, other: &Selection) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) && self.portioning == other.portioning
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Append `ingredient` in spoon mode.
    ///
    /// Without `quantity` the entry gets the default spoon count. With an
    /// explicit `quantity` the spoon count is derived from it (half-up) and
    /// the grams snap to that many whole spoons, so the spoon invariant holds
    /// on this path too. A quantity too large to count in spoons is kept as
    /// grams instead. A present id leaves the selection unchanged.
    pub fn add_ingredient(&self, ingredient: Arc<Ingredient>, quantity: Option<f64>) -> Selection {
        if self.is_selected(&ingredient.id) {
            trace!(id = %ingredient.id, "add ignored: already selected");
            return self.clone();
        }

        let category = ingredient.category;
        let entry = match quantity {
            Some(grams) => {
                let grams = grams.max(0.0);
                match self.portioning.snap(grams, category) {
                    Some((spoon_count, quantity)) => SelectedIngredient {
                        ingredient,
                        quantity,
                        input_mode: InputMode::Spoons,
                        spoon_count,
                    },
                    None => {
                        warn!(id = %ingredient.id, grams, "too many spoons; adding in grams");
                        SelectedIngredient {
                            ingredient,
                            quantity: grams,
                            input_mode: InputMode::Grams,
                            spoon_count: 0,
                        }
                    }
                }
            }
            None => {
                let spoon_count = u64::from(self.portioning.default_spoons);
                SelectedIngredient {
                    quantity: self.portioning.grams_for_spoons(spoon_count, category),
                    ingredient,
                    input_mode: InputMode::Spoons,
                    spoon_count,
                }
            }
        };
        debug!(
            id = %entry.ingredient.id,
            spoon_count = entry.spoon_count,
            quantity = entry.quantity,
            "add ingredient"
        );

        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.extend(self.entries.iter().cloned());
        entries.push(entry);
        self.replace(entries)
    }

    pub fn remove_ingredient(&self, id: &str) -> Selection {
        if !self.is_selected(id) {
            trace!(id, "remove ignored: not selected");
            return self.clone();
        }
        debug!(id, "remove ingredient");
        let entries = self
            .entries
            .iter()
            .filter(|s| s.id() != id)
            .cloned()
            .collect();
        self.replace(entries)
    }

    /// Set grams directly (clamped at zero) and switch the entry to gram mode.
    pub fn update_quantity(&self, id: &str, quantity: f64) -> Selection {
        let quantity = quantity.max(0.0);
        self.update_entry(id, |entry| {
            debug!(id, quantity, "update quantity");
            SelectedIngredient {
                quantity,
                input_mode: InputMode::Grams,
                ..entry.clone()
            }
        })
    }

    /// Set the spoon count (clamped at zero), recompute grams, switch to spoon mode.
    pub fn update_spoons(&self, id: &str, spoons: i64) -> Selection {
        let spoon_count = clamp_spoons(spoons);
        let portioning = self.portioning;
        self.update_entry(id, |entry| {
            let quantity = portioning.grams_for_spoons(spoon_count, entry.ingredient.category);
            debug!(id, spoon_count, quantity, "update spoons");
            SelectedIngredient {
                quantity,
                input_mode: InputMode::Spoons,
                spoon_count,
                ..entry.clone()
            }
        })
    }

    /// Flip grams ↔ spoons.
    ///
    /// Going to spoons rounds the grams to the nearest whole spoon and snaps
    /// the quantity to it, so 47 g of grains becomes 1 spoon = 40 g. Going to
    /// grams keeps the quantity and only changes the mode. An amount too
    /// large to count in spoons stays in grams, unchanged.
    pub fn toggle_input_mode(&self, id: &str) -> Selection {
        let portioning = self.portioning;
        if let Some(entry) = self.get(id)
            && entry.input_mode == InputMode::Grams
            && portioning
                .snap(entry.quantity, entry.ingredient.category)
                .is_none()
        {
            warn!(id, quantity = entry.quantity, "too many spoons; staying in grams");
            return self.clone();
        }
        self.update_entry(id, |entry| match entry.input_mode {
            InputMode::Grams => {
                let (spoon_count, quantity) = portioning
                    .snap(entry.quantity, entry.ingredient.category)
                    .unwrap_or((entry.spoon_count, entry.quantity));
                debug!(id, from = entry.quantity, spoon_count, quantity, "toggle to spoons");
                SelectedIngredient {
                    quantity,
                    input_mode: InputMode::Spoons,
                    spoon_count,
                    ..entry.clone()
                }
            }
            InputMode::Spoons => {
                debug!(id, quantity = entry.quantity, "toggle to grams");
                SelectedIngredient {
                    input_mode: InputMode::Grams,
                    ..entry.clone()
                }
            }
        })
    }

    /// Remove `ingredient` if it is selected, otherwise add it with defaults.
    pub fn toggle_ingredient(&self, ingredient: Arc<Ingredient>) -> Selection {
        if self.is_selected(&ingredient.id) {
            self.remove_ingredient(&ingredient.id)
        } else {
            self.add_ingredient(ingredient, None)
        }
    }

    pub fn clear_all(&self) -> Selection {
        debug!(cleared = self.entries.len(), "clear selection");
        Selection::empty(self.portioning)
    }

    /// Apply a [`Command`] value.
    pub fn apply(&self, command: &Command) -> Selection {
        match command {
            Command::Add {
                ingredient,
                quantity,
            } => self.add_ingredient(Arc::clone(ingredient), *quantity),
            Command::Remove { id } => self.remove_ingredient(id),
            Command::UpdateQuantity { id, quantity } => self.update_quantity(id, *quantity),
            Command::UpdateSpoons { id, spoons } => self.update_spoons(id, *spoons),
            Command::ToggleInputMode { id } => self.toggle_input_mode(id),
            Command::ToggleIngredient { ingredient } => {
                self.toggle_ingredient(Arc::clone(ingredient))
            }
            Command::ClearAll => self.clear_all(),
        }
    }

    fn update_entry(
        &self,
        id: &str,
        f: impl FnOnce(&SelectedIngredient) -> SelectedIngredient,
    ) -> Selection {
        let Some(index) = self.entries.iter().position(|s| s.id() == id) else {
            trace!(id, "update ignored: not selected");
            return self.clone();
        };
        let mut entries = self.entries.as_ref().clone();
        entries[index] = f(&self.entries[index]);
        self.replace(entries)
    }

    fn replace(&self, entries: Vec<SelectedIngredient>) -> Selection {
        Selection {
            entries: Arc::new(entries),
            portioning: self.portioning,
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a SelectedIngredient;
    type IntoIter = std::slice::Iter<'a, SelectedIngredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
