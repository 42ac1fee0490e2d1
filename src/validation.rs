//! Pre-flight checks
//!
//! Commands call these before touching anything. Each failure carries the
//! message and remediation hint that `main` prints before exiting with
//! status 1.

use std::fs;

use serde::Deserialize;

use crate::config::ProjectPaths;
use crate::error::{OptikitError, OptikitResult};
use crate::shell::CommandRunner;

const FLUTTER_INSTALL_URL: &str = "https://flutter.dev/docs/get-started/install";
const FVM_INSTALL_URL: &str = "https://fvm.app/docs/getting_started/installation";
const RUN_FROM_PROJECT_ROOT: &str = "Please run this command from the root of a Flutter project.";

/// `pubspec.yaml` exists and references the Flutter SDK
pub fn validate_flutter_project(paths: &ProjectPaths) -> OptikitResult<()> {
    let pubspec = paths.pubspec();
    if !pubspec.is_file() {
        return Err(OptikitError::precondition(
            "Not a Flutter project: pubspec.yaml not found.",
            RUN_FROM_PROJECT_ROOT,
        ));
    }

    let contents = fs::read_to_string(&pubspec)?;
    if !contents.contains("flutter:") {
        return Err(OptikitError::precondition(
            "Not a Flutter project: pubspec.yaml does not reference Flutter SDK.",
            RUN_FROM_PROJECT_ROOT,
        ));
    }

    Ok(())
}

/// `ios/` exists and holds an Xcode project or workspace
pub fn validate_ios_project(paths: &ProjectPaths) -> OptikitResult<()> {
    if !paths.ios_dir().is_dir() {
        return Err(OptikitError::precondition(
            "iOS project directory not found.",
            "Run 'flutter create .' to add iOS support.",
        ));
    }

    if !paths.xcodeproj().exists() && !paths.xcworkspace().exists() {
        return Err(OptikitError::precondition_only(
            "No Xcode project or workspace found in ios/ directory.",
        ));
    }

    Ok(())
}

/// `android/` exists and holds a Gradle build script
pub fn validate_android_project(paths: &ProjectPaths) -> OptikitResult<()> {
    if !paths.android_dir().is_dir() {
        return Err(OptikitError::precondition(
            "Android project directory not found.",
            "Run 'flutter create .' to add Android support.",
        ));
    }

    if !paths.build_gradle().exists() && !paths.build_gradle_kts().exists() {
        return Err(OptikitError::precondition_only(
            "No build.gradle found in android/ directory.",
        ));
    }

    Ok(())
}

/// The Flutter SDK is reachable, through FVM or globally
pub fn validate_flutter_sdk(
    paths: &ProjectPaths,
    runner: &dyn CommandRunner,
    use_fvm: bool,
) -> OptikitResult<()> {
    if use_fvm {
        if !paths.fvm_sdk().exists() {
            return Err(OptikitError::precondition(
                "FVM Flutter SDK not found at .fvm/flutter_sdk",
                "Run 'fvm install' or use --disable-fvm flag.",
            ));
        }

        return runner.run_silent("fvm --version").map(|_| ()).map_err(|_| {
            OptikitError::precondition(
                "FVM not found. Please install FVM or use --disable-fvm flag.",
                format!("Install FVM: {}", FVM_INSTALL_URL),
            )
        });
    }

    runner.run_silent("flutter --version").map(|_| ()).map_err(|_| {
        OptikitError::precondition(
            "Flutter SDK not found.",
            format!("Install Flutter: {}", FLUTTER_INSTALL_URL),
        )
    })
}

#[derive(Debug, Deserialize)]
struct PubspecHeader {
    name: Option<String>,
    description: Option<String>,
}

/// Project name and description from `pubspec.yaml`, when present
pub fn read_project_identity(paths: &ProjectPaths) -> OptikitResult<(Option<String>, Option<String>)> {
    let contents = fs::read_to_string(paths.pubspec())?;
    let header: PubspecHeader = serde_yaml::from_str(&contents)?;
    Ok((header.name, header.description))
}
