// Configuration loading and persistence

pub mod error;
pub mod settings;
pub mod store;

pub use error::ConfigError;
pub use settings::Settings;
pub use store::FormulaStore;

use std::path::PathBuf;

/// Application config directory (`<config_dir>/tagcalc`)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tagcalc")
}
