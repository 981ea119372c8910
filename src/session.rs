//! One salad-building session.
//!
//! A [`Session`] is the host-side owner of a selection: it holds the catalog
//! the ingredients come from and the current [`Selection`] snapshot, and
//! swaps in the next snapshot after every command. This is the only place
//! catalog ids are resolved into ingredients.

use crate::catalog::Catalog;
use crate::config::SaladConfig;
use crate::nutrition::{DailyValues, NutritionTotal, calculate_nutrition};
use crate::output::NutritionReport;
use crate::portion::PortionError;
use crate::script::ScriptCommand;
use crate::selection::Selection;
use crate::types::Ingredient;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// `add` or `pick` named an id the catalog does not have.
    #[error("unknown ingredient '{0}'")]
    UnknownIngredient(String),
    #[error(transparent)]
    Portioning(#[from] PortionError),
}

/// What executing a single script command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The selection moved to a new snapshot (possibly identical to the old one).
    Updated,
    /// `show`: the caller should render this snapshot.
    Show(Selection),
}

/// Host scope owning the catalog and the current selection snapshot.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    selection: Selection,
    daily_values: DailyValues,
    decimals: usize,
}

impl Session {
    /// Session with stock portions and daily values.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let config = SaladConfig::default();
        Self {
            catalog,
            selection: Selection::new(),
            daily_values: config.daily_values,
            decimals: config.display.decimals,
        }
    }

    /// Session using the portions, daily values and display settings of `config`.
    pub fn with_config(catalog: Arc<Catalog>, config: &SaladConfig) -> Result<Self, SessionError> {
        Ok(Self {
            catalog,
            selection: Selection::with_portioning(config.portions)?,
            daily_values: config.daily_values,
            decimals: config.display.decimals,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current snapshot.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn daily_values(&self) -> &DailyValues {
        &self.daily_values
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    pub fn total(&self) -> NutritionTotal {
        calculate_nutrition(&self.selection)
    }

    pub fn report(&self) -> NutritionReport {
        NutritionReport::build(&self.selection, &self.daily_values)
    }

    /// Run one command against the current snapshot.
    ///
    /// Only `add` and `pick` consult the catalog, and fail on an unknown id.
    /// Every other command leaves an unknown id to the selection store, which
    /// ignores it.
    pub fn execute(&mut self, command: &ScriptCommand) -> Result<Outcome, SessionError> {
        debug!(%command, "execute");
        let next = match command {
            ScriptCommand::Add { id, grams } => {
                let ingredient = self.resolve(id)?;
                self.selection.add_ingredient(ingredient, *grams)
            }
            ScriptCommand::Pick { id } => {
                let ingredient = self.resolve(id)?;
                self.selection.toggle_ingredient(ingredient)
            }
            ScriptCommand::Remove { id } => self.selection.remove_ingredient(id),
            ScriptCommand::Grams { id, grams } => self.selection.update_quantity(id, *grams),
            ScriptCommand::Spoons { id, spoons } => self.selection.update_spoons(id, *spoons),
            ScriptCommand::Toggle { id } => self.selection.toggle_input_mode(id),
            ScriptCommand::Clear => self.selection.clear_all(),
            ScriptCommand::Show => return Ok(Outcome::Show(self.selection.clone())),
        };
        self.selection = next;
        Ok(Outcome::Updated)
    }

    /// Run every command in order, collecting the snapshots requested by `show`.
    ///
    /// Stops at the first failing command; commands before it stay applied.
    pub fn run_script(&mut self, commands: &[ScriptCommand]) -> Result<Vec<Selection>, SessionError> {
        let mut shown = Vec::new();
        for command in commands {
            if let Outcome::Show(snapshot) = self.execute(command)? {
                shown.push(snapshot);
            }
        }
        Ok(shown)
    }

    fn resolve(&self, id: &str) -> Result<Arc<Ingredient>, SessionError> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownIngredient(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portion::Portioning;
    use crate::script::parse_script;
    use crate::selection::InputMode;
    use crate::test_helpers::{CATALOG_JSON, ids};

    fn session() -> Session {
        Session::new(Arc::new(Catalog::from_json_str(CATALOG_JSON).unwrap()))
    }

    #[test]
    fn add_resolves_catalog_ingredient() {
        let mut s = session();
        s.execute(&ScriptCommand::Add {
            id: "kyckling".into(),
            grams: None,
        })
        .unwrap();
        let entry = s.selection().get("kyckling").unwrap();
        assert_eq!(entry.ingredient.name, "Kyckling");
        assert_eq!(entry.quantity, 60.0);
    }

    #[test]
    fn add_unknown_id_is_error() {
        let mut s = session();
        let err = s
            .execute(&ScriptCommand::Add {
                id: "tofu".into(),
                grams: None,
            })
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownIngredient("tofu".into()));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn updates_to_unselected_ids_are_ignored() {
        let mut s = session();
        let before = s.selection().clone();
        s.execute(&ScriptCommand::Grams {
            id: "nothing".into(),
            grams: 10.0,
        })
        .unwrap();
        s.execute(&ScriptCommand::Remove {
            id: "nothing".into(),
        })
        .unwrap();
        assert!(s.selection().same_snapshot(&before));
    }

    #[test]
    fn pick_toggles_membership() {
        let mut s = session();
        let pick = ScriptCommand::Pick {
            id: "fetaost".into(),
        };
        s.execute(&pick).unwrap();
        assert!(s.selection().is_selected("fetaost"));
        s.execute(&pick).unwrap();
        assert!(!s.selection().is_selected("fetaost"));
    }

    #[test]
    fn run_script_collects_shows() {
        let mut s = session();
        let commands = parse_script(
            "add ruccola\nadd quinoa\nshow\ngrams quinoa 47\ntoggle quinoa\nshow\nclear\n",
        )
        .unwrap();
        let shown = s.run_script(&commands).unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(ids(&shown[0]), vec!["ruccola", "quinoa"]);
        let quinoa = shown[1].get("quinoa").unwrap();
        assert_eq!(quinoa.input_mode, InputMode::Spoons);
        assert_eq!(quinoa.quantity, 40.0);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn run_script_stops_at_unknown_ingredient() {
        let mut s = session();
        let commands = parse_script("add ruccola\nadd tofu\nadd quinoa\n").unwrap();
        assert!(s.run_script(&commands).is_err());
        assert_eq!(ids(s.selection()), vec!["ruccola"]);
    }

    #[test]
    fn config_portions_apply() {
        let config = SaladConfig {
            portions: Portioning {
                default_spoons: 1,
                ..Portioning::default()
            },
            ..SaladConfig::default()
        };
        let catalog = Arc::new(Catalog::from_json_str(CATALOG_JSON).unwrap());
        let mut s = Session::with_config(catalog, &config).unwrap();
        s.execute(&ScriptCommand::Add {
            id: "quinoa".into(),
            grams: None,
        })
        .unwrap();
        assert_eq!(s.total().total_weight, 40.0);
    }

    #[test]
    fn config_with_bad_spoon_table_is_rejected() {
        let mut config = SaladConfig::default();
        config.portions.grams_per_spoon.proteins = -30.0;
        let catalog = Arc::new(Catalog::from_json_str(CATALOG_JSON).unwrap());
        let err = Session::with_config(catalog, &config).unwrap_err();
        assert!(matches!(err, SessionError::Portioning(_)));
    }

    #[test]
    fn report_reflects_current_selection() {
        let mut s = session();
        s.execute(&ScriptCommand::Add {
            id: "kyckling".into(),
            grams: None,
        })
        .unwrap();
        let report = s.report();
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.total.total_weight, 60.0);
    }
}
