use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where to look for a config file. Lists are searched in order and the first
/// directory containing the file wins.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Current working directory.
    Cwd,
    /// Directory of the running executable.
    ExeDir,
    /// Every ancestor of the working directory, nearest first, up to the root.
    CwdAncestors,
    /// Every ancestor of the executable's directory, nearest first, up to the root.
    ExeDirAncestors,
    /// Platform config directory for the named application (XDG on Linux,
    /// ~/Library/Application Support on macOS).
    Platform(&'static str),
    /// An explicit directory.
    Path(PathBuf),
}

impl SearchPath {
    /// Working directory, executable directory, then both ancestor chains.
    pub fn defaults() -> Vec<SearchPath> {
        vec![
            SearchPath::Cwd,
            SearchPath::ExeDir,
            SearchPath::CwdAncestors,
            SearchPath::ExeDirAncestors,
        ]
    }
}

/// A single key/value pair supplied programmatically. `key` may be `KEY` or
/// `SECTION::KEY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Entries for both file layers, as delivered by a remote config source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntries {
    #[serde(default)]
    pub base_configs: Vec<ConfigEntry>,
    #[serde(default)]
    pub local_configs: Vec<ConfigEntry>,
}

impl ConfigEntries {
    pub fn from_json(json: &str) -> Result<Self, crate::TiercfgError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_decode_from_json() {
        let json = r#"{
            "base_configs": [{"key": "HOST", "value": "db.internal"}],
            "local_configs": [{"key": "dev::HOST", "value": "localhost"}]
        }"#;
        let entries = ConfigEntries::from_json(json).unwrap();
        assert_eq!(entries.base_configs, vec![ConfigEntry::new("HOST", "db.internal")]);
        assert_eq!(entries.local_configs[0].key, "dev::HOST");
    }

    #[test]
    fn entries_default_missing_layers() {
        let entries = ConfigEntries::from_json(r#"{"local_configs": []}"#).unwrap();
        assert!(entries.base_configs.is_empty());
    }

    #[test]
    fn entries_reject_bad_json() {
        let result = ConfigEntries::from_json("{not json");
        assert!(matches!(result, Err(crate::TiercfgError::Json(_))));
    }

    #[test]
    fn default_search_order() {
        assert_eq!(
            SearchPath::defaults(),
            vec![
                SearchPath::Cwd,
                SearchPath::ExeDir,
                SearchPath::CwdAncestors,
                SearchPath::ExeDirAncestors
            ]
        );
    }
}
