//! Persisted formula store
//!
//! Reads and writes the [`PersistedState`] record (saved formulas, variables,
//! linked models) as `<root>/<namespace>.json`. The live formula being edited
//! is never written here.

use std::fs;
use std::path::{Path, PathBuf};

use tagcalc_engine::PersistedState;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct FormulaStore {
    root: PathBuf,
    namespace: String,
}

impl FormulaStore {
    /// Store under the application config directory
    pub fn new(namespace: &str) -> Result<Self, ConfigError> {
        Self::with_root(crate::config_dir(), namespace)
    }

    /// Store under an explicit directory (tests, `--data-dir`)
    pub fn with_root(root: impl Into<PathBuf>, namespace: &str) -> Result<Self, ConfigError> {
        let namespace = namespace.trim();
        let valid = !namespace.is_empty()
            && namespace != "."
            && namespace != ".."
            && !namespace.contains(['/', '\\']);
        if !valid {
            return Err(ConfigError::InvalidNamespace(namespace.to_string()));
        }
        Ok(Self {
            root: root.into(),
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.namespace))
    }

    /// Read the stored record. `Ok(None)` when nothing has been saved yet.
    pub fn try_load(&self) -> Result<Option<PersistedState>, ConfigError> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path, source })
    }

    /// Read the stored record, falling back to the built-in defaults when it
    /// is missing or unreadable.
    pub fn load(&self) -> PersistedState {
        match self.try_load() {
            Ok(Some(state)) => {
                log::info!(
                    "Loaded {} saved formulas from {}",
                    state.saved_formulas.len(),
                    self.path().display()
                );
                state
            }
            Ok(None) => PersistedState::default(),
            Err(e) => {
                log::warn!("Ignoring unreadable formula store: {}", e);
                PersistedState::default()
            }
        }
    }

    /// Write the record, creating the store directory if needed
    pub fn save(&self, state: &PersistedState) -> Result<(), ConfigError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(state).map_err(ConfigError::Serialize)?;
        fs::write(&path, json).map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        log::info!("Saved formula store to {}", path.display());
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
