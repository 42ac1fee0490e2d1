//! Dry-run recording
//!
//! The recorder is created once per invocation. When disabled every method is
//! a no-op, so callers can record unconditionally.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use colored::*;

/// Something a command would have done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedOperation {
    Command { description: String, command: String },
    File { operation: String, path: PathBuf },
}

/// Collects planned operations while dry-run mode is active
#[derive(Debug, Default)]
pub struct DryRun {
    enabled: bool,
    operations: RefCell<Vec<PlannedOperation>>,
}

impl DryRun {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            operations: RefCell::new(Vec::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Print the dry-run banner
    pub fn announce(&self) {
        if !self.enabled {
            return;
        }
        println!("{}", "DRY-RUN MODE ENABLED - No commands will be executed".yellow());
        println!("{}\n", "Commands will be displayed but not run".dimmed());
    }

    /// Record a command that would be executed
    pub fn record_command(&self, description: &str, command: &str) {
        if !self.enabled {
            return;
        }
        println!("{} {}", "→".cyan(), description.bold());
        println!("  {} {}\n", "Command:".dimmed(), command);
        self.operations.borrow_mut().push(PlannedOperation::Command {
            description: description.to_string(),
            command: command.to_string(),
        });
    }

    /// Record a file operation that would be performed
    pub fn record_file(&self, operation: &str, path: &Path) {
        if !self.enabled {
            return;
        }
        println!("{} {}", "→".cyan(), operation.bold());
        println!("  {} {}\n", "File:".dimmed(), path.display());
        self.operations.borrow_mut().push(PlannedOperation::File {
            operation: operation.to_string(),
            path: path.to_path_buf(),
        });
    }

    pub fn operations(&self) -> Vec<PlannedOperation> {
        self.operations.borrow().clone()
    }

    /// Print how many commands and file operations were skipped
    pub fn print_summary(&self) {
        let operations = self.operations.borrow();
        if !self.enabled || operations.is_empty() {
            return;
        }

        let commands = operations
            .iter()
            .filter(|op| matches!(op, PlannedOperation::Command { .. }))
            .count();
        let files = operations.len() - commands;
        let rule = "=".repeat(60);

        println!("\n{}", rule.yellow());
        println!("{}", "DRY-RUN SUMMARY".yellow().bold());
        println!("{}", rule.yellow());
        println!("\nTotal operations: {}", operations.len());
        println!("  Commands: {}", commands);
        println!("  File operations: {}", files);
        println!("\n{}", rule.yellow());
        println!("{}", "No actual changes were made to your system.".dimmed());
        println!("{}\n", "Run without --dry-run to execute these operations.".dimmed());
    }
}
