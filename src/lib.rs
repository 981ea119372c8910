//! # Salad Builder
//!
//! Compose a salad from a fixed ingredient catalog and see what it adds up
//! to: energy, macros, salt and fiber, in absolute terms, per 100 g, and as a
//! share of a 2000 kcal daily reference intake.
//!
//! # Architecture: Store → Aggregator
//!
//! Two pieces carry all the logic:
//!
//! ```text
//! commands ──▶ Selection store ──▶ snapshot ──▶ Nutrition aggregator ──▶ totals
//!              (selection)                      (nutrition)
//! ```
//!
//! - The **selection store** is an immutable-snapshot state machine. Every
//!   command (`add`, `remove`, set grams, set spoons, toggle unit, clear)
//!   returns a new [`selection::Selection`] and leaves the old one intact.
//! - The **aggregator** is a set of pure functions over a snapshot. Nothing
//!   is cached; totals are recomputed whenever they are asked for.
//!
//! Everything else is plumbing around those two: loading the catalog,
//! reading configuration, parsing command scripts, and printing reports.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Catalog records: `Ingredient`, `Category`, `NutritionFacts` |
//! | [`portion`] | Spoon ↔ gram conversion table and half-up rounding |
//! | [`selection`] | The selection store and its `Command` reducer |
//! | [`nutrition`] | Totals, per-100g rescaling, daily values, number formatting |
//! | [`catalog`] | Catalog loading (JSON/TOML), validation, filtering |
//! | [`script`] | Line-oriented command language for the CLI |
//! | [`session`] | Host scope owning a catalog and the current snapshot |
//! | [`config`] | `salad.toml` loading, merging and validation |
//! | [`output`] | Report model and CLI text formatting |
//! | [`logging`] | `tracing-subscriber` setup for the binary |
//!
//! # Design Decisions
//!
//! ## Grams Are the Source of Truth
//!
//! Quantities are always stored in grams. Spoons are an input mode: while an
//! entry is edited in spoons its grams are `spoons × grams_per_spoon` for the
//! ingredient's category; while edited in grams the spoon count is ignored.
//! Switching from grams to spoons rounds half up to a whole spoon and snaps
//! the grams to match, so a spoon count is always a whole number of scoops.
//!
//! ## Snapshots Instead of a Mutable Store
//!
//! Each command produces a fresh snapshot. Commands that change nothing
//! return a snapshot sharing storage with their input, so a host can skip
//! re-rendering by checking [`selection::Selection::same_snapshot`].
//!
//! ## Total Operations
//!
//! The core never fails on well-typed input. Unknown ids are ignored,
//! negative amounts clamp to zero, a duplicate add keeps the first entry,
//! and per-100g of an empty salad is all zeros. Errors exist only at the
//! edges: unreadable catalog or config files and malformed scripts.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod nutrition;
pub mod output;
pub mod portion;
pub mod script;
pub mod selection;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
