//! Formula archive
//!
//! Named, immutable snapshots of a token sequence and the result it had when
//! saved. Snapshots are only ever appended or deleted; loading hands back the
//! stored tokens and result untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::EngineError;
use crate::sequence::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedFormulaId(Uuid);

impl SavedFormulaId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SavedFormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SavedFormulaId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFormula {
    pub id: SavedFormulaId,
    pub name: String,
    pub tokens: Vec<Token>,
    /// Formatted result at save time (`None` if never evaluated)
    pub result: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaArchive {
    formulas: Vec<SavedFormula>,
}

impl FormulaArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_formulas(formulas: Vec<SavedFormula>) -> Self {
        Self { formulas }
    }

    /// Append a snapshot. Blank names are rejected with `None`.
    pub fn save(&mut self, name: &str, tokens: Vec<Token>, result: Option<String>) -> Option<SavedFormulaId> {
        match self.try_save(name, tokens, result) {
            Ok(id) => Some(id),
            Err(e) => {
                log::debug!("Rejected saving formula ({}): {}", e.kind(), e);
                None
            }
        }
    }

    /// Append a snapshot, failing with [`EngineError::EmptyName`] when the
    /// trimmed name is blank.
    pub fn try_save(
        &mut self,
        name: &str,
        tokens: Vec<Token>,
        result: Option<String>,
    ) -> Result<SavedFormulaId, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }

        let id = SavedFormulaId::new();
        self.formulas.push(SavedFormula {
            id,
            name: name.to_string(),
            tokens,
            result,
            timestamp: Utc::now(),
        });
        log::info!("Saved formula '{}' ({})", name, id);
        Ok(id)
    }

    pub fn delete(&mut self, id: SavedFormulaId) -> bool {
        let before = self.formulas.len();
        self.formulas.retain(|f| f.id != id);
        let removed = self.formulas.len() != before;
        if removed {
            log::info!("Deleted saved formula {}", id);
        }
        removed
    }

    pub fn load(&self, id: SavedFormulaId) -> Option<&SavedFormula> {
        self.formulas.iter().find(|f| f.id == id)
    }

    /// Saved formulas, oldest first
    pub fn list(&self) -> &[SavedFormula] {
        &self.formulas
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Token> {
        vec![Token::tag("Base salary"), Token::text("*"), Token::text("2")]
    }

    #[test]
    fn test_save_and_load() {
        let mut archive = FormulaArchive::new();
        let tokens = sample();
        let id = archive.save("Double pay", tokens.clone(), Some("$350,000.00".into())).unwrap();

        let saved = archive.load(id).unwrap();
        assert_eq!(saved.name, "Double pay");
        assert_eq!(saved.tokens, tokens);
        assert_eq!(saved.result.as_deref(), Some("$350,000.00"));
    }

    #[test]
    fn test_save_rejects_blank_name() {
        let mut archive = FormulaArchive::new();
        assert!(archive.save("", sample(), None).is_none());
        assert!(archive.save("   ", sample(), None).is_none());
        assert_eq!(archive.try_save(" \t", sample(), None), Err(EngineError::EmptyName));
        assert!(archive.is_empty());
    }

    #[test]
    fn test_save_trims_name() {
        let mut archive = FormulaArchive::new();
        let id = archive.save("  Raise ", sample(), None).unwrap();
        assert_eq!(archive.load(id).unwrap().name, "Raise");
    }

    #[test]
    fn test_delete() {
        let mut archive = FormulaArchive::new();
        let a = archive.save("A", sample(), None).unwrap();
        let b = archive.save("B", sample(), None).unwrap();

        assert!(archive.delete(a));
        assert!(!archive.delete(a));
        assert!(archive.load(a).is_none());
        assert_eq!(archive.list().len(), 1);
        assert_eq!(archive.list()[0].id, b);
    }

    #[test]
    fn test_id_parse() {
        let mut archive = FormulaArchive::new();
        let id = archive.save("A", sample(), None).unwrap();
        let parsed: SavedFormulaId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<SavedFormulaId>().is_err());
    }
}
