//! `open-ios` and `open-android`

use crate::config::Context;
use crate::display::logger;
use crate::error::OptikitResult;
use crate::shell::CommandRunner;
use crate::validation::{validate_android_project, validate_flutter_project, validate_ios_project};

const OPEN_XCODE: &str = "open ios/Runner.xcworkspace";

/// Platform command that opens `android/` in Android Studio
pub fn android_studio_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "start android"
    } else if cfg!(target_os = "macos") {
        "open -a 'Android Studio' android"
    } else {
        "xdg-open android"
    }
}

pub fn open_ios(ctx: &Context, runner: &dyn CommandRunner) -> OptikitResult<()> {
    logger::info("Opening the iOS project in Xcode...");

    validate_flutter_project(ctx.paths())?;
    validate_ios_project(ctx.paths())?;

    runner.run(OPEN_XCODE)?;
    logger::success("Xcode opened successfully.");
    Ok(())
}

pub fn open_android(ctx: &Context, runner: &dyn CommandRunner) -> OptikitResult<()> {
    logger::info("Opening the Android project in Android Studio...");

    validate_flutter_project(ctx.paths())?;
    validate_android_project(ctx.paths())?;

    runner.run(android_studio_command())?;
    logger::success("Android Studio opened successfully.");
    Ok(())
}
