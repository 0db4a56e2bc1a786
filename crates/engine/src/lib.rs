pub mod archive;
pub mod error;
pub mod format;
pub mod formula;
pub mod models;
pub mod persist;
pub mod registry;
pub mod sequence;
pub mod session;
pub mod suggest;

pub use archive::{FormulaArchive, SavedFormula, SavedFormulaId};
pub use error::EngineError;
pub use models::{LinkedModel, ModelSet};
pub use persist::PersistedState;
pub use registry::{DisplayFormat, VariableBinding, VariableLookup, VariableRegistry};
pub use sequence::{Token, TokenId, TokenKind, TokenSequence};
pub use session::{FormulaSession, EXAMPLES};
pub use suggest::{Catalog, Suggestion, SuggestionKind, SuggestionTracker, TagStyle};
