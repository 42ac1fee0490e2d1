//! User settings for OptiKit
//!
//! Settings are read from the first `.optikitrc` file found (see
//! [`ProjectPaths::config_candidates`]) and merged over the defaults: any key
//! missing from the file keeps its default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::ProjectPaths;
use crate::display::logger;
use crate::error::OptikitError;

/// Default number of snapshots kept per backup folder
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User settings for OptiKit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Snapshots kept per backup folder after a trim
    #[serde(default = "default_backup_retention")]
    pub backup_retention_count: usize,

    /// Route Flutter commands through FVM unless `--disable-fvm` is given
    #[serde(default = "default_true")]
    pub use_fvm_by_default: bool,

    /// Snapshot files before destructive operations
    #[serde(default = "default_true")]
    pub auto_backup: bool,

    /// Print executed commands and other diagnostics
    #[serde(default)]
    pub verbose: bool,
}

fn default_backup_retention() -> usize {
    DEFAULT_BACKUP_RETENTION
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_retention_count: default_backup_retention(),
            use_fvm_by_default: true,
            auto_backup: true,
            verbose: false,
        }
    }
}

impl Settings {
    /// Locate the config file that applies to this project
    pub fn find_config(paths: &ProjectPaths, home: Option<&Path>) -> Option<PathBuf> {
        paths
            .config_candidates(home)
            .into_iter()
            .find(|candidate| candidate.is_file())
    }

    /// Load settings, falling back to defaults when no file exists or the
    /// file cannot be parsed
    pub fn load(paths: &ProjectPaths, home: Option<&Path>) -> Self {
        let Some(config_path) = Self::find_config(paths, home) else {
            return Self::default();
        };

        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                logger::warning(format!(
                    "Failed to load config from {}, using defaults. ({})",
                    config_path.display(),
                    e
                ));
                Self::default()
            }
        }
    }

    /// Parse a specific config file
    pub fn load_from(path: &Path) -> Result<Self, OptikitError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OptikitError::Io(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| OptikitError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save settings to `.optikitrc.json` in the project root
    pub fn save(&self, paths: &ProjectPaths) -> Result<PathBuf, OptikitError> {
        let config_path = paths.config_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            OptikitError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&config_path, contents)
            .map_err(|e| OptikitError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backup_retention_count, 5);
        assert!(settings.use_fvm_by_default);
        assert!(settings.auto_backup);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let paths = ProjectPaths::with_root(project.path());

        let settings = Settings::load(&paths, Some(home.path()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_config_merges_over_defaults() {
        let project = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(".optikitrc"),
            r#"{ "backupRetentionCount": 2, "verbose": true }"#,
        )
        .unwrap();
        let paths = ProjectPaths::with_root(project.path());

        let settings = Settings::load(&paths, None);
        assert_eq!(settings.backup_retention_count, 2);
        assert!(settings.verbose);
        assert!(settings.auto_backup);
        assert!(settings.use_fvm_by_default);
    }

    #[test]
    fn test_project_config_wins_over_home() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        std::fs::write(
            project.path().join(".optikitrc.json"),
            r#"{ "autoBackup": false }"#,
        )
        .unwrap();
        std::fs::write(home.path().join(".optikitrc"), r#"{ "verbose": true }"#).unwrap();
        let paths = ProjectPaths::with_root(project.path());

        let settings = Settings::load(&paths, Some(home.path()));
        assert!(!settings.auto_backup);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_home_config_used_as_fallback() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join(".optikitrc.json"), r#"{ "useFvmByDefault": false }"#)
            .unwrap();
        let paths = ProjectPaths::with_root(project.path());

        let settings = Settings::load(&paths, Some(home.path()));
        assert!(!settings.use_fvm_by_default);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join(".optikitrc"), "not json").unwrap();
        let paths = ProjectPaths::with_root(project.path());

        assert_eq!(Settings::load(&paths, None), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let project = TempDir::new().unwrap();
        let paths = ProjectPaths::with_root(project.path());

        let settings = Settings {
            backup_retention_count: 9,
            ..Settings::default()
        };
        let written = settings.save(&paths).unwrap();
        assert!(written.ends_with(".optikitrc.json"));

        let contents = std::fs::read_to_string(&written).unwrap();
        assert!(contents.contains("\"backupRetentionCount\": 9"));

        let loaded = Settings::load(&paths, None);
        assert_eq!(loaded, settings);
    }
}
