//! Release builds

use std::fmt;

use crate::config::Context;
use crate::display::logger;
use crate::error::OptikitResult;
use crate::shell::{flutter_command, CommandRunner};
use crate::validation::{
    validate_android_project, validate_flutter_project, validate_flutter_sdk, validate_ios_project,
};

const SPLIT_DEBUG_INFO: &str = "--split-debug-info=build/app/outputs/symbols";

/// Artifact produced by a `flutter-build-*` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    Apk,
    Bundle,
    Ios,
    Ipa,
}

impl BuildTarget {
    fn base_command(self) -> &'static str {
        match self {
            Self::Apk => "flutter build apk",
            Self::Bundle => "flutter build appbundle",
            Self::Ios => "flutter build ios",
            Self::Ipa => "flutter build ipa",
        }
    }

    fn flags(self) -> Vec<&'static str> {
        match self {
            Self::Apk | Self::Bundle => vec!["--release", "--obfuscate", SPLIT_DEBUG_INFO],
            Self::Ios | Self::Ipa => vec!["--release"],
        }
    }

    fn is_android(self) -> bool {
        matches!(self, Self::Apk | Self::Bundle)
    }

    /// Full command line for this target
    pub fn command(self, use_fvm: bool) -> String {
        let mut parts = vec![flutter_command(self.base_command(), use_fvm)];
        parts.extend(self.flags().into_iter().map(String::from));
        parts.join(" ")
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Apk => "APK",
            Self::Bundle => "Bundle",
            Self::Ios => "iOS app",
            Self::Ipa => "IPA",
        };
        write!(f, "{}", label)
    }
}

pub fn build_release(
    ctx: &Context,
    runner: &dyn CommandRunner,
    target: BuildTarget,
    disable_fvm: bool,
) -> OptikitResult<()> {
    let use_fvm = ctx.use_fvm(disable_fvm);
    logger::info(format!(
        "Building Flutter {} {} FVM...",
        target,
        if use_fvm { "with" } else { "without" }
    ));

    validate_flutter_project(ctx.paths())?;
    validate_flutter_sdk(ctx.paths(), runner, use_fvm)?;
    if target.is_android() {
        validate_android_project(ctx.paths())?;
    } else {
        validate_ios_project(ctx.paths())?;
    }

    runner.run(&target.command(use_fvm))?;
    logger::success(format!("Flutter {} build successful.", target));
    Ok(())
}
