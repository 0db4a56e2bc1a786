use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing a config file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// File contents are not valid JSON for the expected shape.
    Parse { path: PathBuf, source: serde_json::Error },
    /// Serializing state for writing failed.
    Serialize(serde_json::Error),
    /// Storage namespace is empty or would escape the store directory.
    InvalidNamespace(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Parse { path, source } => write!(f, "invalid JSON in {}: {}", path.display(), source),
            Self::Serialize(e) => write!(f, "failed to serialize state: {e}"),
            Self::InvalidNamespace(ns) => write!(f, "invalid storage namespace: {ns:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
            Self::InvalidNamespace(_) => None,
        }
    }
}
