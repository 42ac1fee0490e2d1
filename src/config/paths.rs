//! Path management for OptiKit
//!
//! Every command operates on the Flutter project in the current working
//! directory. `ProjectPaths` resolves the well-known files inside it.
//!
//! ## Config Search Order
//!
//! 1. `.optikitrc`, `.optikitrc.json` in the project root
//! 2. `.optikitrc`, `.optikitrc.json` in the home directory
//!
//! The home directory is `OPTIKIT_HOME` when set, otherwise the platform home
//! directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::OptikitError;

/// Name of the hidden folder that holds snapshots next to the original file
pub const BACKUP_DIR_NAME: &str = ".optikit-backup";

/// Config file names, in lookup order within one directory
pub const CONFIG_FILE_NAMES: [&str; 2] = [".optikitrc", ".optikitrc.json"];

/// File `init` writes
pub const CONFIG_FILE_WRITE_NAME: &str = ".optikitrc.json";

/// Resolves the files of a Flutter project
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Paths rooted at the current working directory
    pub fn from_current_dir() -> Result<Self, OptikitError> {
        let root = std::env::current_dir()
            .map_err(|e| OptikitError::Io(format!("Failed to read current directory: {}", e)))?;
        Ok(Self { root })
    }

    /// Paths rooted at an explicit directory (useful for testing)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pubspec(&self) -> PathBuf {
        self.root.join("pubspec.yaml")
    }

    pub fn pubspec_lock(&self) -> PathBuf {
        self.root.join("pubspec.lock")
    }

    pub fn ios_dir(&self) -> PathBuf {
        self.root.join("ios")
    }

    pub fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    pub fn xcodeproj(&self) -> PathBuf {
        self.ios_dir().join("Runner.xcodeproj")
    }

    pub fn xcworkspace(&self) -> PathBuf {
        self.ios_dir().join("Runner.xcworkspace")
    }

    /// `ios/Runner.xcodeproj/project.pbxproj`
    pub fn pbxproj(&self) -> PathBuf {
        self.xcodeproj().join("project.pbxproj")
    }

    /// `ios/Runner/Info.plist`
    pub fn info_plist(&self) -> PathBuf {
        self.ios_dir().join("Runner").join("Info.plist")
    }

    pub fn podfile_lock(&self) -> PathBuf {
        self.ios_dir().join("Podfile.lock")
    }

    pub fn build_gradle(&self) -> PathBuf {
        self.android_dir().join("build.gradle")
    }

    pub fn build_gradle_kts(&self) -> PathBuf {
        self.android_dir().join("build.gradle.kts")
    }

    /// Project-local SDK link maintained by FVM
    pub fn fvm_sdk(&self) -> PathBuf {
        self.root.join(".fvm").join("flutter_sdk")
    }

    /// Parent of all generated modules (`lib/module`)
    pub fn module_dir(&self) -> PathBuf {
        self.root.join("lib").join("module")
    }

    pub fn vscode_dir(&self) -> PathBuf {
        self.root.join(".vscode")
    }

    pub fn vscode_settings(&self) -> PathBuf {
        self.vscode_dir().join("settings.json")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// The config file `init` creates
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_WRITE_NAME)
    }

    /// Candidate config files in priority order
    pub fn config_candidates(&self, home: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .collect();

        if let Some(home) = home {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| home.join(name)));
        }

        candidates
    }
}

/// Resolve the user's home directory
pub fn home_dir() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("OPTIKIT_HOME") {
        return Some(PathBuf::from(custom));
    }
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_paths() {
        let paths = ProjectPaths::with_root("/work/app");
        assert_eq!(
            paths.pbxproj(),
            PathBuf::from("/work/app/ios/Runner.xcodeproj/project.pbxproj")
        );
        assert_eq!(
            paths.info_plist(),
            PathBuf::from("/work/app/ios/Runner/Info.plist")
        );
        assert_eq!(paths.podfile_lock(), PathBuf::from("/work/app/ios/Podfile.lock"));
    }

    #[test]
    fn test_config_candidates_order() {
        let paths = ProjectPaths::with_root("/work/app");
        let candidates = paths.config_candidates(Some(Path::new("/home/dev")));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/work/app/.optikitrc"),
                PathBuf::from("/work/app/.optikitrc.json"),
                PathBuf::from("/home/dev/.optikitrc"),
                PathBuf::from("/home/dev/.optikitrc.json"),
            ]
        );
    }

    #[test]
    fn test_config_candidates_without_home() {
        let paths = ProjectPaths::with_root("/work/app");
        assert_eq!(paths.config_candidates(None).len(), 2);
    }
}
