//! Status-line logging
//!
//! Every orchestrator reports progress through these helpers so that the
//! prefixes and colours stay consistent across commands.

use colored::*;

/// Informational progress message
pub fn info(message: impl AsRef<str>) {
    println!("{} {}", "INFO".blue().bold(), message.as_ref());
}

/// A step completed successfully
pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "SUCCESS".green().bold(), message.as_ref());
}

/// Something unexpected that does not abort the command
pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "WARNING".yellow().bold(), message.as_ref());
}

/// A failure; written to stderr
pub fn error(message: impl AsRef<str>) {
    eprintln!("{} {}", "ERROR".red().bold(), message.as_ref());
}

/// Remediation advice following an error
pub fn hint(message: impl AsRef<str>) {
    eprintln!("     {}", message.as_ref().dimmed());
}

/// Diagnostic output, shown only in verbose mode
pub fn debug(verbose: bool, message: impl AsRef<str>) {
    if verbose {
        println!("{} {}", "DEBUG".dimmed(), message.as_ref().dimmed());
    }
}

/// Section heading used by the listing commands
pub fn heading(message: impl AsRef<str>) {
    println!("\n{}", message.as_ref().bold());
}
