//! `clean-flutter` and `clean-ios`

use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::{cleanup_backups, create_backup};
use crate::config::Context;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};
use crate::shell::{flutter_command, CommandRunner, RetryPolicy};
use crate::validation::{validate_flutter_project, validate_flutter_sdk, validate_ios_project};

const XCFRAMEWORK: &str = "bin/cache/artifacts/engine/ios/Flutter.xcframework";

/// `flutter clean`, drop `pubspec.lock`, `flutter pub get`
pub fn clean_flutter(ctx: &Context, runner: &dyn CommandRunner, disable_fvm: bool) -> OptikitResult<()> {
    let use_fvm = ctx.use_fvm(disable_fvm);
    logger::info(if use_fvm {
        "Running clean with FVM..."
    } else {
        "Running clean without FVM..."
    });

    validate_flutter_project(ctx.paths())?;
    validate_flutter_sdk(ctx.paths(), runner, use_fvm)?;

    logger::info("Running Flutter clean...");
    runner.run(&flutter_command("flutter clean", use_fvm))?;
    logger::success("Flutter clean completed.");

    let lock = ctx.paths().pubspec_lock();
    if lock.exists() {
        logger::info("Removing pubspec.lock...");
        remove_with_backup(ctx, &lock)?;
        logger::success("pubspec.lock removed.");
    } else {
        logger::info("pubspec.lock does not exist, skipping removal.");
    }

    logger::info("Running Flutter pub get...");
    runner.run(&flutter_command("flutter pub get", use_fvm))?;
    logger::success("Flutter pub get completed.");

    logger::success("Project cleaned successfully.");
    Ok(())
}

/// Options for `clean-ios`
#[derive(Debug, Clone, Copy, Default)]
pub struct IosCleanOptions {
    pub clean_cache: bool,
    pub repo_update: bool,
    pub disable_fvm: bool,
    /// Applied to every CocoaPods install or update
    pub retry: RetryPolicy,
}

/// Reset the CocoaPods integration of the iOS subproject.
///
/// `runner` must execute inside `ios/`.
pub fn clean_ios(ctx: &Context, runner: &dyn CommandRunner, options: IosCleanOptions) -> OptikitResult<()> {
    validate_flutter_project(ctx.paths())?;
    validate_ios_project(ctx.paths())?;

    logger::info("Running clean for iOS project...");
    ensure_flutter_artifacts(ctx, runner, ctx.use_fvm(options.disable_fvm));

    logger::info("Removing Podfile.lock...");
    let podfile_lock = ctx.paths().podfile_lock();
    if podfile_lock.exists() {
        remove_with_backup(ctx, &podfile_lock)?;
        logger::success("Removed Podfile.lock.");
    } else {
        logger::info("Podfile.lock does not exist, skipping removal.");
    }

    logger::info("Deintegrating pods...");
    runner.run("pod deintegrate")?;
    logger::success("Deintegrated pods.");

    if options.clean_cache {
        logger::info("Cleaning CocoaPods cache...");
        runner.run("pod cache clean --all")?;
        logger::success("Cleaned CocoaPods cache.");
    }

    let policy = options.retry;
    if options.repo_update {
        logger::info("Updating CocoaPods repositories...");
        match runner.run_with_retry("pod repo update", policy) {
            Ok(_) => logger::success("Updated CocoaPods repositories."),
            Err(_) => logger::error("Failed to update CocoaPods repositories."),
        }

        logger::info("Installing pods with repo update...");
        match runner.run_with_retry("pod update", policy) {
            Ok(_) => logger::success("Installed pods with repo update."),
            Err(_) => logger::error("Failed to update pods."),
        }
    } else {
        logger::info("Installing pods without repo update...");
        runner.run_with_retry("pod install", policy)?;
        logger::success("Installed pods without repo update.");
    }

    Ok(())
}

/// Download the iOS engine artifacts when the SDK cache lacks them.
/// A failed precache is logged and otherwise ignored.
fn ensure_flutter_artifacts(ctx: &Context, runner: &dyn CommandRunner, use_fvm: bool) {
    let sdk_root = match flutter_sdk_root(ctx, use_fvm) {
        Ok(root) => root,
        Err(e) => {
            logger::error(e.to_string());
            return;
        }
    };

    if sdk_root.join(XCFRAMEWORK).exists() {
        logger::success("Flutter.xcframework exists. No need to run precache.");
        return;
    }

    logger::warning("Flutter.xcframework not found.");
    logger::info("Downloading Flutter.xcframework...");
    let precache = flutter_command("flutter precache --ios", use_fvm);
    match runner.run(&precache) {
        Ok(_) => logger::success("Flutter.xcframework has been downloaded successfully."),
        Err(e) => logger::error(format!("Failed to run precache: {}", e)),
    }
}

/// Root of the Flutter SDK: the FVM link when in use, otherwise two levels
/// above the `flutter` executable on `PATH`
fn flutter_sdk_root(ctx: &Context, use_fvm: bool) -> OptikitResult<PathBuf> {
    let fvm_sdk = ctx.paths().fvm_sdk();
    if use_fvm && fvm_sdk.exists() {
        logger::info("Using FVM Flutter SDK...");
        return Ok(fvm_sdk);
    }

    let flutter = which::which("flutter").map_err(|_| {
        OptikitError::precondition_only("Flutter SDK not found. Please ensure Flutter is installed.")
    })?;
    let flutter = fs::canonicalize(&flutter).unwrap_or(flutter);

    logger::info("Using Flutter SDK...");
    flutter
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| OptikitError::file_not_found("Flutter SDK", &flutter))
}

/// Snapshot `file` (when auto-backup is on), trim its backup folder and
/// delete it. Backup failures are logged and do not stop the deletion.
fn remove_with_backup(ctx: &Context, file: &Path) -> OptikitResult<()> {
    let settings = ctx.settings();

    if ctx.is_dry_run() {
        if settings.auto_backup {
            ctx.dry_run().record_file("Back up", file);
        }
        ctx.dry_run().record_file("Delete", file);
        return Ok(());
    }

    if settings.auto_backup {
        if let Err(e) = create_backup(file) {
            logger::warning(format!("Backup of {} failed: {}", file.display(), e));
        }
        if let Some(dir) = file.parent() {
            if let Err(e) = cleanup_backups(dir, settings.backup_retention_count) {
                logger::warning(format!("Could not trim old backups: {}", e));
            }
        }
    }

    fs::remove_file(file)
        .map_err(|e| OptikitError::Io(format!("Failed to delete {}: {}", file.display(), e)))
}
