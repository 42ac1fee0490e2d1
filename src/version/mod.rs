//! App version handling
//!
//! A Flutter app carries its version in `pubspec.yaml` as `X.Y.Z+B`, where
//! `B` is the build number. The iOS project keeps its own copy in
//! `project.pbxproj` and `Info.plist`, and its build number is allowed to
//! drift from Android's after the first bump.
//!
//! All edits are whole-file regex substitutions; the manifest is never parsed
//! structurally for writing.

mod patcher;
mod record;

pub use patcher::VersionPatcher;
pub use record::{BumpKind, VersionRecord};
