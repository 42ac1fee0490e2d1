//! Version commands
//!
//! `flutter-update-version` writes explicit values; the `version`
//! subcommands read the current record from `pubspec.yaml` and derive the
//! next one.

use clap::Subcommand;
use colored::*;
use regex::Regex;

use crate::config::Context;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};
use crate::validation::{read_project_identity, validate_flutter_project};
use crate::version::{BumpKind, VersionPatcher, VersionRecord};

/// Build number the iOS side restarts from after a semantic bump
const IOS_BUILD_AFTER_BUMP: u64 = 1;

/// `version` subcommands
#[derive(Subcommand)]
pub enum VersionCommands {
    /// Bump version (major, minor, or patch)
    Bump {
        #[arg(value_enum)]
        kind: BumpKind,
    },

    /// Increment iOS build number only (for TestFlight)
    BumpIos,

    /// Increment Android build number only
    BumpAndroid,
}

/// Handle `version [subcommand]`
pub fn handle_version_command(ctx: &Context, cmd: Option<VersionCommands>) -> OptikitResult<()> {
    match cmd {
        None => show_version(ctx).map(|_| ()),
        Some(VersionCommands::Bump { kind }) => bump_version(ctx, kind).map(|_| ()),
        Some(VersionCommands::BumpIos) => bump_ios_build(ctx).map(|_| ()),
        Some(VersionCommands::BumpAndroid) => bump_android_build(ctx).map(|_| ()),
    }
}

/// Print the current version broken into its components
pub fn show_version(ctx: &Context) -> OptikitResult<VersionRecord> {
    let current = VersionPatcher::new(ctx.paths().clone()).current_version()?;

    logger::heading("Current Version Information");
    if let Ok((Some(name), description)) = read_project_identity(ctx.paths()) {
        match description {
            Some(description) => println!("{} {} ({})", "Project:".cyan(), name, description.dimmed()),
            None => println!("{} {}", "Project:".cyan(), name),
        }
    }
    println!("{} {}", "Version:".cyan(), current.to_string().bold());
    println!("  {} {}", "Major:".dimmed(), current.major);
    println!("  {} {}", "Minor:".dimmed(), current.minor);
    println!("  {} {}", "Patch:".dimmed(), current.patch);
    println!("  {} {}", "Build:".dimmed(), current.build_number);
    println!();

    Ok(current)
}

/// Semantic bump: Android takes the new build number, iOS restarts at 1
pub fn bump_version(ctx: &Context, kind: BumpKind) -> OptikitResult<VersionRecord> {
    validate_flutter_project(ctx.paths())?;

    let patcher = VersionPatcher::new(ctx.paths().clone());
    let current = patcher.current_version()?;
    let next = current.increment(kind)?;

    logger::info(format!("Current version: {}", current));
    logger::info(format!("Bumping {} version...", kind));

    println!("\n{}", "Version changes:".cyan());
    println!("  {} {}", "Old:".dimmed(), current);
    println!("  {} {}", "New:".dimmed(), next.to_string().green().bold());
    println!("\n{}", "Build number strategy:".cyan());
    println!(
        "  {} {} -> {} (incremented)",
        "Android:".dimmed(),
        current.build_number,
        next.build_number
    );
    println!(
        "  {} {} -> {} (reset for new version)",
        "iOS:".dimmed(),
        current.build_number,
        IOS_BUILD_AFTER_BUMP
    );
    println!();

    apply(
        ctx,
        &patcher,
        &next.semver(),
        &next.build_number.to_string(),
        &IOS_BUILD_AFTER_BUMP.to_string(),
    )?;

    logger::success(format!("Version bumped to {}", next));
    Ok(next)
}

/// iOS build + 1; version and Android build unchanged
pub fn bump_ios_build(ctx: &Context) -> OptikitResult<VersionRecord> {
    validate_flutter_project(ctx.paths())?;

    let patcher = VersionPatcher::new(ctx.paths().clone());
    let current = patcher.current_version()?;
    let next = current.next_build()?;

    logger::info(format!("Current version: {}", current));
    logger::info("Incrementing iOS build number only (for TestFlight)...");

    println!("\n{}", "Build number changes:".cyan());
    println!("  {} {} (unchanged)", "Version:".dimmed(), current.semver());
    println!("  {} {} (unchanged)", "Android:".dimmed(), current.build_number);
    println!(
        "  {} {} -> {} {}",
        "iOS:".dimmed(),
        current.build_number,
        next.build_number,
        "(incremented)".green()
    );
    println!();

    apply(ctx, &patcher, &current.semver(), "", &next.build_number.to_string())?;

    logger::success(format!("iOS build number incremented to {}", next.build_number));
    Ok(next)
}

/// Android build + 1; version and iOS build unchanged
pub fn bump_android_build(ctx: &Context) -> OptikitResult<VersionRecord> {
    validate_flutter_project(ctx.paths())?;

    let patcher = VersionPatcher::new(ctx.paths().clone());
    let current = patcher.current_version()?;
    let next = current.next_build()?;

    logger::info(format!("Current version: {}", current));
    logger::info("Incrementing Android build number only...");

    println!("\n{}", "Build number changes:".cyan());
    println!("  {} {} (unchanged)", "Version:".dimmed(), current.semver());
    println!(
        "  {} {} -> {} {}",
        "Android:".dimmed(),
        current.build_number,
        next.build_number,
        "(incremented)".green()
    );
    println!("  {} (unchanged)", "iOS:".dimmed());
    println!();

    apply(ctx, &patcher, &current.semver(), &next.build_number.to_string(), "")?;

    logger::success(format!(
        "Android build number incremented to {}",
        next.build_number
    ));
    Ok(next)
}

/// `flutter-update-version`: write explicit values
pub fn update_version(
    ctx: &Context,
    app_version: &str,
    android_build: &str,
    ios_build: &str,
) -> OptikitResult<()> {
    validate_flutter_project(ctx.paths())?;

    let app_version = app_version.trim();
    if !Regex::new(r"^\d+\.\d+\.\d+$")?.is_match(app_version) {
        return Err(OptikitError::Validation(format!(
            "Invalid app version: '{}'. Expected format: X.Y.Z (e.g., 1.2.3)",
            app_version
        )));
    }

    let build_re = Regex::new(r"^\d*$")?;
    for (platform, build) in [("Android", android_build), ("iOS", ios_build)] {
        if !build_re.is_match(build.trim()) {
            return Err(OptikitError::Validation(format!(
                "Invalid {} build number: '{}'. Expected a whole number.",
                platform, build
            )));
        }
    }

    let patcher = VersionPatcher::new(ctx.paths().clone());
    apply(ctx, &patcher, app_version, android_build, ios_build)
}

/// Propagate, or record the files that would change in dry-run mode
fn apply(
    ctx: &Context,
    patcher: &VersionPatcher,
    version: &str,
    android_build: &str,
    ios_build: &str,
) -> OptikitResult<()> {
    if !ctx.is_dry_run() {
        return patcher.propagate(version, android_build, ios_build);
    }

    let paths = ctx.paths();
    let dry_run = ctx.dry_run();
    if !android_build.trim().is_empty() {
        dry_run.record_file(
            &format!("Set version {}+{}", version, android_build.trim()),
            &paths.pubspec(),
        );
    }
    if !ios_build.trim().is_empty() {
        let operation = format!("Set iOS version {} build {}", version, ios_build.trim());
        dry_run.record_file(&operation, &paths.pbxproj());
        dry_run.record_file(&operation, &paths.info_plist());
    }
    Ok(())
}
