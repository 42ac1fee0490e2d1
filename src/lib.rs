//! OptiKit - command-line helper for Flutter projects
//!
//! Wraps `flutter`, `fvm`, `pod` and the IDE launchers, patches version
//! numbers into `pubspec.yaml` and the iOS project files, scaffolds modules
//! from templates, and keeps timestamped snapshots of files it is about to
//! delete so they can be rolled back.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Project paths, settings and the per-run context
//! - `error`: Custom error types
//! - `display`: Coloured logging and formatting helpers
//! - `shell`: External command execution, retry and dry-run recording
//! - `backup`: Snapshot, restore and retention of single files
//! - `version`: Version records and the project file patcher
//! - `validation`: Pre-flight checks shared by the commands
//! - `scaffold`: Module templates
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use optikit::config::{paths::home_dir, Context, ProjectPaths, Settings};
//!
//! let paths = ProjectPaths::from_current_dir()?;
//! let settings = Settings::load(&paths, home_dir().as_deref());
//! let ctx = Context::new(paths, settings, false, false);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod scaffold;
pub mod shell;
pub mod validation;
pub mod version;

pub use error::OptikitError;
