//! Formula editing session
//!
//! Composes the separately owned pieces of one editor: the live token
//! sequence, the variable registry, the linked models and the formula
//! archive, plus the last evaluation result. Each session owns its own copy
//! of all of them; nothing here is shared between sessions.

use crate::archive::{FormulaArchive, SavedFormulaId};
use crate::error::EngineError;
use crate::formula::{build_expression, evaluate_formatted};
use crate::models::ModelSet;
use crate::registry::{VariableBinding, VariableRegistry};
use crate::sequence::{TokenId, TokenKind, TokenSequence};

/// Result shown when building or evaluating fails
pub const ERROR_RESULT: &str = "Error";

/// A ready-made formula, as a list of parts. Parts naming a variable become
/// tags; everything else is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleFormula {
    pub display: &'static str,
    pub parts: &'static [&'static str],
}

pub const EXAMPLES: &[ExampleFormula] = &[
    ExampleFormula {
        display: "Base salary * (1 + 0.05)",
        parts: &["Base salary", "*", "(", "1", "+", "0.05", ")"],
    },
    ExampleFormula {
        display: "Base salary + Option grant * Current valuation",
        parts: &["Base salary", "+", "Option grant", "*", "Current valuation"],
    },
    ExampleFormula {
        display: "Base salary + Annual equity comp",
        parts: &["Base salary", "+", "Annual equity comp"],
    },
];

#[derive(Debug, Clone, Default)]
pub struct FormulaSession {
    sequence: TokenSequence,
    registry: VariableRegistry,
    models: ModelSet,
    archive: FormulaArchive,
    result: Option<String>,
}

impl FormulaSession {
    /// Session with the built-in models and variables and an empty archive
    pub fn new() -> Self {
        Self::with_state(VariableRegistry::with_defaults(), ModelSet::with_defaults(), FormulaArchive::new())
    }

    pub fn with_state(registry: VariableRegistry, models: ModelSet, archive: FormulaArchive) -> Self {
        Self {
            sequence: TokenSequence::new(),
            registry,
            models,
            archive,
            result: None,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn sequence(&self) -> &TokenSequence {
        &self.sequence
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    pub fn archive(&self) -> &FormulaArchive {
        &self.archive
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn insert_tag(&mut self, name: impl Into<String>) {
        self.sequence.insert_tag(name);
    }

    pub fn insert_char(&mut self, ch: char) {
        self.sequence.insert_char(ch);
    }

    pub fn insert_text(&mut self, text: &str) {
        self.sequence.insert_text(text);
    }

    pub fn delete_token(&mut self, id: TokenId) -> bool {
        self.sequence.delete_token(id)
    }

    pub fn delete_backward(&mut self) {
        self.sequence.delete_backward();
    }

    pub fn move_backward(&mut self) {
        self.sequence.move_backward();
    }

    pub fn move_forward(&mut self) {
        self.sequence.move_forward();
    }

    pub fn select_tag(&mut self, id: Option<TokenId>) -> bool {
        self.sequence.select_tag(id)
    }

    pub fn replace_token_at(&mut self, index: usize, kind: TokenKind, value: impl Into<String>) -> bool {
        self.sequence.replace_token_at(index, kind, value)
    }

    /// Empty the formula and forget the cached result
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.result = None;
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Build and evaluate the current formula, caching and returning the
    /// formatted result. Failures of any kind yield `"Error"`.
    pub fn evaluate(&mut self) -> &str {
        let result = match self.try_evaluate() {
            Ok(formatted) => formatted,
            Err(err) => {
                match &err {
                    EngineError::UnknownVariable(name) => {
                        log::warn!("Formula references unknown variable '{}'", name)
                    }
                    other => log::warn!("Formula evaluation failed [{}]: {}", other.kind(), other),
                }
                ERROR_RESULT.to_string()
            }
        };
        self.result.insert(result).as_str()
    }

    /// Build and evaluate without touching the cached result
    pub fn try_evaluate(&self) -> Result<String, EngineError> {
        let expr = build_expression(self.sequence.tokens(), &self.registry)?;
        log::debug!("Evaluating expression: {}", expr);
        evaluate_formatted(&expr)
    }

    /// Clear, type out `parts` the way the example picker does, then evaluate
    pub fn apply_example(&mut self, parts: &[&str]) -> &str {
        const NO_SPACE_BEFORE: [&str; 6] = ["+", "-", "*", "/", ")", "("];
        const NO_SPACE_AFTER: [&str; 5] = ["+", "-", "*", "/", "("];

        self.clear();
        for (i, part) in parts.iter().enumerate() {
            if self.registry.contains(part) {
                self.sequence.insert_tag(*part);
            } else {
                self.sequence.insert_text(part);
            }

            if let Some(next) = parts.get(i + 1) {
                if !NO_SPACE_BEFORE.contains(next) && !NO_SPACE_AFTER.contains(part) {
                    self.sequence.insert_text(" ");
                }
            }
        }
        self.evaluate()
    }

    // ------------------------------------------------------------------
    // Archive
    // ------------------------------------------------------------------

    /// Snapshot the current formula under `name`, evaluating first when no
    /// result is cached. Returns `None` for a blank name.
    pub fn save(&mut self, name: &str) -> Option<SavedFormulaId> {
        if name.trim().is_empty() {
            return None;
        }
        if self.result.is_none() {
            self.evaluate();
        }
        self.archive
            .save(name, self.sequence.snapshot(), self.result.clone())
    }

    pub fn delete_saved(&mut self, id: SavedFormulaId) -> bool {
        self.archive.delete(id)
    }

    /// Replace the live formula with a saved one. The cursor goes to the end
    /// and the stored result is restored as-is.
    pub fn load(&mut self, id: SavedFormulaId) -> bool {
        let Some(saved) = self.archive.load(id) else {
            return false;
        };
        self.sequence = TokenSequence::from_tokens(saved.tokens.clone());
        self.result = saved.result.clone();
        log::info!("Loaded saved formula '{}'", saved.name);
        true
    }

    // ------------------------------------------------------------------
    // Variables and models
    // ------------------------------------------------------------------

    pub fn set_variable(&mut self, id: &str, value: f64) -> bool {
        self.registry.update_value(id, value)
    }

    pub fn add_variable(&mut self, binding: VariableBinding) -> Result<(), String> {
        self.registry.insert(binding)
    }

    /// Variables of the active model
    pub fn active_variables(&self) -> Vec<&VariableBinding> {
        match self.models.active() {
            Some(model) => self.registry.for_model(&model.id).collect(),
            None => Vec::new(),
        }
    }

    pub fn add_model(&mut self, name: &str, kind: &str, icon: Option<String>, color: Option<String>) -> String {
        self.models.add(name, kind, icon, color)
    }

    pub fn remove_model(&mut self, id: &str) -> bool {
        self.models.remove(id)
    }

    pub fn set_active_model(&mut self, id: &str) -> bool {
        self.models.set_active(id)
    }

    pub(crate) fn into_parts(self) -> (VariableRegistry, ModelSet, FormulaArchive) {
        (self.registry, self.models, self.archive)
    }
}
