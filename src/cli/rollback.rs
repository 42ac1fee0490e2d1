//! `rollback`: list snapshots or restore one by index

use std::path::Path;

use chrono::Utc;
use colored::*;

use crate::backup::{restore_backup, BackupCatalog, BackupEntry};
use crate::config::Context;
use crate::display::{format_local, format_size_kb, format_time_ago, logger};
use crate::error::{OptikitError, OptikitResult};

/// List or restore depending on whether an index was given
pub fn handle_rollback(ctx: &Context, restore: Option<usize>) -> OptikitResult<()> {
    match restore {
        Some(index) => rollback_restore(ctx, index).map(|_| ()),
        None => rollback_list(ctx).map(|_| ()),
    }
}

/// Print every snapshot below the project root, grouped by original file
pub fn rollback_list(ctx: &Context) -> OptikitResult<BackupCatalog> {
    logger::info("Searching for OptiKit backups...");

    let root = ctx.paths().root();
    let catalog = BackupCatalog::scan(root)?;

    if catalog.is_empty() {
        logger::warning("No backups found in this project.");
        logger::info("Backups are created automatically when files are modified.");
        return Ok(catalog);
    }

    println!("{}", format!("\nFound {} backup(s):", catalog.len()).bold());

    let now = Utc::now();
    let mut index = 0;
    for group in catalog.groups() {
        println!("\n{}", display_path(root, &group.original_path).cyan().bold());
        for entry in &group.entries {
            index += 1;
            println!("{}", describe(index, entry, now));
        }
    }

    let rule = "=".repeat(60);
    println!("\n{}", rule.yellow());
    println!("{}", "To restore a backup, run:".dimmed());
    println!("  optikit rollback --restore <number>");
    println!("\n{}", "Example:".dimmed());
    println!("  optikit rollback --restore 1");
    println!("{}\n", rule.yellow());

    Ok(catalog)
}

/// Copy snapshot `index` of a fresh listing back over its original
pub fn rollback_restore(ctx: &Context, index: usize) -> OptikitResult<BackupEntry> {
    let catalog = BackupCatalog::scan(ctx.paths().root())?;
    let entry = catalog.get(index)?.clone();

    logger::info(format!("Restoring: {}", entry.original_path.display()));
    logger::info(format!("From backup: {}", format_local(entry.timestamp)));

    if ctx.is_dry_run() {
        ctx.dry_run().record_file(
            &format!("Restore from {}", entry.backup_path.display()),
            &entry.original_path,
        );
        return Ok(entry);
    }

    if !restore_backup(&entry.original_path, &entry.backup_path)? {
        return Err(OptikitError::precondition_only("Failed to restore backup."));
    }

    logger::success("Backup restored successfully!");
    Ok(entry)
}

fn describe(index: usize, entry: &BackupEntry, now: chrono::DateTime<Utc>) -> String {
    format!(
        "  {} {} {}",
        format!("[{}]", index).dimmed(),
        format_local(entry.timestamp),
        format!(
            "({}, {})",
            format_time_ago(entry.timestamp, now),
            format_size_kb(entry.size)
        )
        .dimmed()
    )
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
