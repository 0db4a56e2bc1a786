// Application settings
// Loaded from ~/.config/tagcalc/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_NAMESPACE: &str = "formula-storage";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Storage
    #[serde(rename = "storage.namespace")]
    pub namespace: String,

    // Logging
    #[serde(rename = "log.level")]
    pub log_level: String,

    // Suggestions
    #[serde(rename = "suggestions.limit")]
    pub suggestion_limit: usize,

    // Editor
    #[serde(rename = "editor.evaluateOnLoad")]
    pub evaluate_on_load: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            log_level: "warn".to_string(),
            suggestion_limit: 10,
            evaluate_on_load: false,
        }
    }
}

const DEFAULT_FILE: &str = r#"{
    // Storage key for saved formulas, variables and linked models
    "storage.namespace": "formula-storage",

    // Log filter (error, warn, info, debug, trace); TAGCALC_LOG overrides
    "log.level": "warn",

    // Maximum autocomplete suggestions shown
    "suggestions.limit": 10,

    // Re-evaluate a saved formula on load instead of showing its stored result
    "editor.evaluateOnLoad": false
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        crate::config_dir().join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file is created with commented
    /// defaults; an unreadable or invalid one is logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            if let Err(e) = Self::create_default_file(path) {
                log::warn!("Could not create default settings: {}", e);
            }
            return Self::default();
        }

        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(io_err)
    }

    fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, DEFAULT_FILE).map_err(io_err)
    }
}
