//! External command execution
//!
//! Every call to `flutter`, `fvm`, `pod` and the platform "open" commands
//! goes through a [`CommandRunner`]. The production runner is
//! [`ShellExecutor`], which spawns the command line through the platform
//! shell; tests substitute their own runner.
//!
//! # Retry
//!
//! CocoaPods talks to remote spec repositories and fails intermittently.
//! [`CommandRunner::run_with_retry`] re-runs a command a fixed number of times
//! with a fixed pause in between, using the pure [`retry`] helper.
//!
//! # Dry Run
//!
//! With a [`DryRun`] recorder attached, mutating commands are recorded and
//! printed instead of executed.

mod dry_run;
mod executor;
mod retry;

pub use dry_run::{DryRun, PlannedOperation};
pub use executor::{flutter_command, CommandRunner, ShellExecutor};
pub use retry::{retry, RetryPolicy};
