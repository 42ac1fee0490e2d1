//! CLI command handlers
//!
//! Each handler validates its preconditions, then drives the executor, the
//! backup store or the version patcher. Handlers that spawn processes take
//! the runner as a parameter so tests can substitute a recording fake.

pub mod build;
pub mod clean;
pub mod devices;
pub mod generate;
pub mod open;
pub mod rollback;
pub mod setup;
pub mod version;

pub use build::{build_release, BuildTarget};
pub use clean::{clean_flutter, clean_ios, IosCleanOptions};
pub use devices::{list_devices, run_app, run_select, Device, RunOptions};
pub use generate::{handle_generate_command, GenerateCommands};
pub use open::{open_android, open_ios};
pub use rollback::handle_rollback;
pub use setup::{init_project, setup_vscode};
pub use version::{handle_version_command, update_version, VersionCommands};
