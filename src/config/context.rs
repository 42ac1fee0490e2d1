//! Run context shared by all commands
//!
//! Built once in `main` from the command-line flags and the loaded settings,
//! then only borrowed.

use super::paths::ProjectPaths;
use super::settings::Settings;
use crate::shell::{DryRun, ShellExecutor};

/// Immutable per-invocation state
#[derive(Debug)]
pub struct Context {
    paths: ProjectPaths,
    settings: Settings,
    dry_run: DryRun,
    verbose: bool,
}

impl Context {
    pub fn new(paths: ProjectPaths, settings: Settings, dry_run: bool, verbose: bool) -> Self {
        let verbose = verbose || settings.verbose;
        Self {
            paths,
            settings,
            dry_run: DryRun::new(dry_run),
            verbose,
        }
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dry_run(&self) -> &DryRun {
        &self.dry_run
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.is_enabled()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether Flutter commands go through FVM for this invocation
    pub fn use_fvm(&self, disable_fvm: bool) -> bool {
        !disable_fvm && self.settings.use_fvm_by_default
    }

    /// Executor rooted at the project directory
    pub fn executor(&self) -> ShellExecutor<'_> {
        ShellExecutor::new()
            .with_dry_run(&self.dry_run)
            .in_dir(self.paths.root())
            .verbose(self.verbose)
    }

    /// Executor rooted at the `ios/` subproject
    pub fn ios_executor(&self) -> ShellExecutor<'_> {
        self.executor().in_dir(self.paths.ios_dir())
    }
}
