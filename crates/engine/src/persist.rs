//! Persisted state record
//!
//! The subset of a session that outlives it: saved formulas, variable
//! bindings and linked models. The live token sequence, cursor, selection
//! and cached result are never part of it.

use serde::{Deserialize, Serialize};

use crate::archive::FormulaArchive;
use crate::models::ModelSet;
use crate::registry::VariableRegistry;
use crate::session::FormulaSession;

/// Record format version, bumped on incompatible changes
pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub saved_formulas: FormulaArchive,
    #[serde(default = "VariableRegistry::with_defaults")]
    pub variable_values: VariableRegistry,
    #[serde(default)]
    pub linked_models: ModelSet,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            saved_formulas: FormulaArchive::new(),
            variable_values: VariableRegistry::with_defaults(),
            linked_models: ModelSet::with_defaults(),
        }
    }
}

impl PersistedState {
    /// Copy the persistent parts out of a live session
    pub fn from_session(session: &FormulaSession) -> Self {
        Self {
            version: STATE_VERSION,
            saved_formulas: session.archive().clone(),
            variable_values: session.registry().clone(),
            linked_models: session.models().clone(),
        }
    }

    /// Start a fresh editing session over this state
    pub fn into_session(self) -> FormulaSession {
        FormulaSession::with_state(
            self.variable_values,
            self.linked_models,
            self.saved_formulas,
        )
    }
}

impl From<FormulaSession> for PersistedState {
    fn from(session: FormulaSession) -> Self {
        let (variable_values, linked_models, saved_formulas) = session.into_parts();
        Self {
            version: STATE_VERSION,
            saved_formulas,
            variable_values,
            linked_models,
        }
    }
}
