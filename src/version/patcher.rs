//! Reads the current version and writes new versions into project files

use std::fs;
use std::path::Path;

use regex::{NoExpand, Regex};

use super::record::VersionRecord;
use crate::config::ProjectPaths;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};

/// Edits the version fields of one Flutter project
#[derive(Debug, Clone)]
pub struct VersionPatcher {
    paths: ProjectPaths,
}

impl VersionPatcher {
    pub fn new(paths: ProjectPaths) -> Self {
        Self { paths }
    }

    /// Version currently declared in `pubspec.yaml`
    pub fn current_version(&self) -> OptikitResult<VersionRecord> {
        let pubspec = self.paths.pubspec();
        if !pubspec.exists() {
            return Err(OptikitError::precondition(
                "pubspec.yaml not found. Are you in a Flutter project?",
                "Please run this command from the root of a Flutter project.",
            ));
        }

        let contents = read(&pubspec, "pubspec.yaml")?;
        let re = Regex::new(r"version:\s*(\d+\.\d+\.\d+\+\d+)")?;
        let caps = re
            .captures(&contents)
            .ok_or_else(|| OptikitError::Validation("No version found in pubspec.yaml".into()))?;

        VersionRecord::parse(&caps[1])
    }

    /// Write `version` and the platform build numbers into the project.
    ///
    /// An empty (or blank) build number skips that platform. Steps run in
    /// order and earlier writes stay in place when a later one fails.
    pub fn propagate(&self, version: &str, android_build: &str, ios_build: &str) -> OptikitResult<()> {
        let android_build = android_build.trim();
        let ios_build = ios_build.trim();

        logger::info(format!("Starting update for version {}...", version));

        if android_build.is_empty() {
            logger::info("Android build number not provided. Skipping pubspec.yaml update.");
        } else {
            logger::info("Updating build number in pubspec.yaml...");
            self.update_manifest(version, android_build)?;
        }

        if ios_build.is_empty() {
            logger::info("iOS build number not provided. Skipping iOS update.");
        } else {
            logger::info("Updating iOS version and build number...");
            self.update_project_settings(version, ios_build)?;
            self.update_info_plist(version, ios_build)?;
        }

        let mut summary = format!("Update complete. Version set to {}", version);
        if !android_build.is_empty() {
            summary.push_str(&format!(", Android build set to {}", android_build));
        }
        if !ios_build.is_empty() {
            summary.push_str(&format!(", and iOS build set to {}", ios_build));
        }
        logger::success(summary);

        Ok(())
    }

    /// Replace every `version: X.Y.Z+B` line in `pubspec.yaml`
    pub fn update_manifest(&self, version: &str, build: &str) -> OptikitResult<()> {
        let pubspec = self.paths.pubspec();
        let re = Regex::new(r"version: \d+\.\d+\.\d+\+\d+")?;
        let replacement = format!("version: {}+{}", version, build);

        rewrite(&pubspec, "pubspec.yaml", |contents| {
            re.replace_all(contents, NoExpand(&replacement)).into_owned()
        })?;

        logger::success(format!(
            "Updated pubspec.yaml with version {} and build {}",
            version, build
        ));
        Ok(())
    }

    /// Replace `MARKETING_VERSION` and `CURRENT_PROJECT_VERSION` in `project.pbxproj`
    pub fn update_project_settings(&self, version: &str, ios_build: &str) -> OptikitResult<()> {
        let pbxproj = self.paths.pbxproj();
        let marketing = Regex::new(r"MARKETING_VERSION\s*=\s*[^;]+;")?;
        let current = Regex::new(r"CURRENT_PROJECT_VERSION\s*=\s*[^;]+;")?;
        let marketing_value = format!("MARKETING_VERSION = {};", version);
        let current_value = format!("CURRENT_PROJECT_VERSION = {};", ios_build);

        rewrite(&pbxproj, "project.pbxproj", |contents| {
            let contents = marketing.replace_all(contents, NoExpand(&marketing_value));
            current
                .replace_all(&contents, NoExpand(&current_value))
                .into_owned()
        })?;

        logger::success(format!(
            "Updated MARKETING_VERSION to {} and CURRENT_PROJECT_VERSION to {}",
            version, ios_build
        ));
        Ok(())
    }

    /// Replace the templated bundle version strings in `Info.plist`.
    ///
    /// Only the `${MARKETING_VERSION}` / `${CURRENT_PROJECT_VERSION}`
    /// placeholders are matched; a plist that already holds literal values is
    /// left as it is.
    pub fn update_info_plist(&self, version: &str, ios_build: &str) -> OptikitResult<()> {
        let plist = self.paths.info_plist();
        let short_version = Regex::new(
            r"<key>CFBundleShortVersionString</key>\s*<string>\$\{MARKETING_VERSION\}</string>",
        )?;
        let bundle_version = Regex::new(
            r"<key>CFBundleVersion</key>\s*<string>\$\{CURRENT_PROJECT_VERSION\}</string>",
        )?;
        let short_value = format!(
            "<key>CFBundleShortVersionString</key><string>{}</string>",
            version
        );
        let bundle_value = format!("<key>CFBundleVersion</key><string>{}</string>", ios_build);

        rewrite(&plist, "Info.plist", |contents| {
            let contents = short_version.replace_all(contents, NoExpand(&short_value));
            bundle_version
                .replace_all(&contents, NoExpand(&bundle_value))
                .into_owned()
        })?;

        logger::success("Updated Info.plist with the new version and iOS build.");
        Ok(())
    }
}

fn read(path: &Path, entity_type: &'static str) -> OptikitResult<String> {
    if !path.exists() {
        return Err(OptikitError::file_not_found(entity_type, path));
    }
    fs::read_to_string(path)
        .map_err(|e| OptikitError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

fn rewrite<F>(path: &Path, entity_type: &'static str, edit: F) -> OptikitResult<()>
where
    F: FnOnce(&str) -> String,
{
    let contents = read(path, entity_type)?;
    let updated = edit(&contents);
    fs::write(path, updated)
        .map_err(|e| OptikitError::Io(format!("Failed to write {}: {}", path.display(), e)))
}
