use anyhow::Context;
use serde::{Deserialize, Serialize};
use sheetedit_editor::{LibraryDescriptor, SessionOptions};
use sheetedit_updates::{LibraryCheck, UpdateConfig};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "sheetedit.config.json";

/// Sheetedit configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Undo levels kept per editor (0 = unlimited)
    #[serde(default = "default_undo_capacity")]
    pub undo_capacity: usize,

    /// Ask before discarding unapplied changes
    #[serde(default = "default_prompt_for_save")]
    pub prompt_for_save: bool,

    #[serde(default)]
    pub updates: UpdateConfig,

    /// Configured data libraries
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
}

/// A library plus the version installed on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub library: LibraryDescriptor,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub installed_version: String,
}

impl LibraryEntry {
    pub fn check(&self) -> LibraryCheck {
        LibraryCheck {
            key: self.library.key(),
            title: self.library.title.clone(),
            installed_version: self.installed_version.clone(),
        }
    }
}

fn default_undo_capacity() -> usize {
    100
}

fn default_prompt_for_save() -> bool {
    true
}

impl Config {
    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn save(&self, cwd: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::path(cwd), content)?;
        Ok(())
    }

    /// Options for an editor of `document_name` documents
    pub fn session_options(&self, document_name: &str) -> SessionOptions {
        SessionOptions {
            undo_capacity: self.undo_capacity,
            prompt_for_save: self.prompt_for_save,
            document_name: document_name.to_string(),
        }
    }

    pub fn library(&self, key: &str) -> Option<&LibraryEntry> {
        self.libraries.iter().find(|entry| entry.library.key() == key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_capacity: default_undo_capacity(),
            prompt_for_save: default_prompt_for_save(),
            updates: UpdateConfig::default(),
            libraries: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "undoCapacity": 25,
            "updates": { "appVersion": "5.0.0", "timeoutSecs": 30 },
            "libraries": [
                {
                    "title": "Master Library",
                    "githubAccount": "richardwilkes",
                    "repoName": "gcs_master_library",
                    "pathOnDisk": "/data/master",
                    "installedVersion": "4.1.0"
                }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.undo_capacity, 25);
        assert!(config.prompt_for_save);
        assert_eq!(config.updates.timeout_secs, 30);
        assert_eq!(config.libraries.len(), 1);

        let entry = config.library("richardwilkes/gcs_master_library").unwrap();
        assert!(entry.library.is_master());
        assert_eq!(entry.check().installed_version, "4.1.0");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.undo_capacity, 100);
        assert!(config.prompt_for_save);
        assert!(config.libraries.is_empty());
        assert_eq!(config.session_options("Body Type").document_name, "Body Type");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.updates.last_seen_version = Some("5.1.0".to_string());
        config.save(dir.path()).unwrap();

        assert_eq!(Config::load(dir.path()).unwrap(), config);
    }
}
