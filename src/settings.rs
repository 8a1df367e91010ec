//! User settings, persisted as JSON in the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::xer::LinkMode;
use crate::model::trade::Trade;
use crate::model::MAX_HISTORY_LENGTH;

const APP_NAME: &str = "RustWorkflowApp";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted user settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Number of undo snapshots kept.
    pub max_history: usize,
    /// Key the project document is stored under.
    pub storage_key: String,
    pub default_project_name: String,
    /// Author recorded on comments added from this machine.
    pub comment_author: String,
    /// Trade library used to tag tasks created from prompts.
    pub trades: Vec<Trade>,
    /// How imported XER activities are linked.
    pub import_link_mode: LinkMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_LENGTH,
            storage_key: "workflow-storage".into(),
            default_project_name: "Untitled Project".into(),
            comment_author: "Current User".into(),
            trades: Vec::new(),
            import_link_mode: LinkMode::Chain,
        }
    }
}

impl AppSettings {
    /// Load from the OS config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`; unreadable or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("failed to parse settings {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => dirs.config_dir().join(SETTINGS_FILE),
            None => PathBuf::from(".").join(SETTINGS_FILE),
        }
    }

    /// Directory the project document lives in.
    pub fn data_dir() -> PathBuf {
        match directories::ProjectDirs::from("", "", APP_NAME) {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = AppSettings::default();
        assert_eq!(s.max_history, 50);
        assert_eq!(s.storage_key, "workflow-storage");
        assert_eq!(s.import_link_mode, LinkMode::Chain);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "max_history": 10, "import_link_mode": "predecessors" }"#).unwrap();

        let s = AppSettings::load_from(&path);
        assert_eq!(s.max_history, 10);
        assert_eq!(s.import_link_mode, LinkMode::Predecessors);
        assert_eq!(s.default_project_name, "Untitled Project");
    }

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppSettings::load_from(&dir.path().join("nope.json")), AppSettings::default());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut s = AppSettings::default();
        s.comment_author = "Site Lead".into();
        s.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path).comment_author, "Site Lead");
    }
}
