//! Backup system for OptiKit
//!
//! Protects project files from destructive commands and allows rolling them
//! back later.
//!
//! # Architecture
//!
//! - `manager`: creates, restores and trims snapshots of single files
//! - `catalog`: finds every snapshot below a project root and numbers them
//!
//! # Snapshot Layout
//!
//! A snapshot of `<dir>/<stem><ext>` is stored as
//! `<dir>/.optikit-backup/<stem>_<timestamp><ext>`, where the timestamp is the
//! UTC creation instant in ISO-8601 form with `:` and `.` replaced by `-`,
//! e.g. `pubspec.lock` → `pubspec_2024-03-02T10-15-30-123Z.lock`. The
//! filesystem is the only record: timestamps and sizes are read back from
//! file metadata.
//!
//! # Retention
//!
//! Snapshots are never pruned implicitly. Callers that want a bound call
//! [`cleanup_backups`] after creating one.
//!
//! # Example
//!
//! ```rust,ignore
//! use optikit::backup::{create_backup, restore_backup, BackupCatalog};
//!
//! let snapshot = create_backup(Path::new("pubspec.lock"))?;
//! std::fs::remove_file("pubspec.lock")?;
//!
//! // Later, restore the newest snapshot listed first
//! let catalog = BackupCatalog::scan(Path::new("."))?;
//! let entry = catalog.get(1)?;
//! restore_backup(&entry.original_path, &entry.backup_path)?;
//! ```

mod catalog;
mod manager;

pub use catalog::{find_all_backups, original_path_for, BackupCatalog, BackupEntry, BackupGroup};
pub use manager::{
    backup_dir_for, cleanup_backups, create_backup, restore_backup, snapshot_file_name,
};
