//! Checker configuration from `hubcheck.toml`.

use crate::core::changeset;
use crate::core::error::HubError;
use crate::core::metadata::DEFAULT_METADATA_FILE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "hubcheck.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    /// Plugins root, relative to the working directory.
    pub plugins_dir: String,
    pub metadata_file: String,
    /// Environment variable holding the whitespace-separated changed files.
    pub changed_files_env: String,
    /// Reference used when reading a plugin's committed metadata.
    pub base_ref: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            plugins_dir: "plugins".to_string(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            changed_files_env: "CHANGED_FILES".to_string(),
            base_ref: "HEAD".to_string(),
        }
    }
}

impl HubConfig {
    /// Load `explicit` if given, otherwise `hubcheck.toml` in `work_dir`.
    ///
    /// No default file means default settings; a missing explicit file is an
    /// error.
    pub fn load(work_dir: &Path, explicit: Option<&Path>) -> Result<Self, HubError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = work_dir.join(CONFIG_FILE);
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&path).map_err(HubError::IoError)?;
        Self::parse(&content).map_err(|message| HubError::ConfigError {
            path: path.display().to_string(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        let config: HubConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        if changeset::normalize_root(config.plugins_dir.trim()).is_empty() {
            return Err("plugins_dir must name a directory below the repository root".to_string());
        }
        if config.metadata_file.trim().is_empty() {
            return Err("metadata_file must not be empty".to_string());
        }
        Ok(config)
    }

    /// Plugins root as it appears at the start of repository-relative paths.
    pub fn plugins_root_name(&self) -> String {
        changeset::normalize_root(&self.plugins_dir)
    }

    /// Absolute plugins root.
    pub fn plugins_path(&self, work_dir: &Path) -> Result<PathBuf, HubError> {
        let root = self.plugins_root_name();
        if root.is_empty() {
            return Err(HubError::PathError(format!(
                "plugins directory '{}' must be below the working directory",
                self.plugins_dir
            )));
        }
        let joined = work_dir.join(root);
        joined.canonicalize().map_err(|e| {
            HubError::PathError(format!(
                "plugins directory {} is not accessible: {}",
                joined.display(),
                e
            ))
        })
    }
}
