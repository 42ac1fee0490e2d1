//! Snapshot creation, restore and retention for single files

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::config::paths::BACKUP_DIR_NAME;
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};

/// Backup folder that holds snapshots of `file`
pub fn backup_dir_for(file: &Path) -> PathBuf {
    file.parent()
        .unwrap_or_else(|| Path::new(""))
        .join(BACKUP_DIR_NAME)
}

/// Snapshot name for `file` taken at `at`: `<stem>_<timestamp><ext>`
pub fn snapshot_file_name(file: &Path, at: DateTime<Utc>) -> OptikitResult<String> {
    let stem = file.file_stem().ok_or_else(|| {
        OptikitError::Validation(format!("Cannot back up {}: no file name", file.display()))
    })?;

    let extension = file
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    Ok(format!(
        "{}_{}{}",
        stem.to_string_lossy(),
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        extension
    ))
}

/// Copy `file` into its sibling backup folder.
///
/// Returns `Ok(None)` without touching the filesystem when `file` does not
/// exist. The original is never modified.
pub fn create_backup(file: &Path) -> OptikitResult<Option<PathBuf>> {
    if !file.exists() {
        logger::warning(format!(
            "File does not exist, skipping backup: {}",
            file.display()
        ));
        return Ok(None);
    }

    let backup_dir = backup_dir_for(file);
    let backup_path = backup_dir.join(snapshot_file_name(file, Utc::now())?);

    fs::create_dir_all(&backup_dir).map_err(|e| {
        OptikitError::Io(format!("Failed to create backup directory: {}", e))
    })?;

    fs::copy(file, &backup_path)
        .map_err(|e| OptikitError::Io(format!("Failed to create backup: {}", e)))?;

    logger::info(format!("Backup created: {}", backup_path.display()));
    Ok(Some(backup_path))
}

/// Copy `backup` over `original`.
///
/// Returns `Ok(false)` when the snapshot does not exist. The file being
/// overwritten is not snapshotted first.
pub fn restore_backup(original: &Path, backup: &Path) -> OptikitResult<bool> {
    if !backup.exists() {
        logger::error(format!("Backup file not found: {}", backup.display()));
        return Ok(false);
    }

    fs::copy(backup, original)
        .map_err(|e| OptikitError::Io(format!("Failed to restore backup: {}", e)))?;

    logger::success(format!("Restored from backup: {}", original.display()));
    Ok(true)
}

/// Keep the `keep_count` most recently modified snapshots in
/// `directory/.optikit-backup` and delete the rest.
///
/// Returns the deleted paths. A missing backup folder is not an error.
pub fn cleanup_backups(directory: &Path, keep_count: usize) -> OptikitResult<Vec<PathBuf>> {
    let backup_dir = directory.join(BACKUP_DIR_NAME);
    if !backup_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut snapshots: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in fs::read_dir(&backup_dir).map_err(|e| {
        OptikitError::Io(format!("Failed to read backup directory: {}", e))
    })? {
        let entry = entry
            .map_err(|e| OptikitError::Io(format!("Failed to read directory entry: {}", e)))?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            snapshots.push((entry.path(), metadata.modified()?));
        }
    }

    // Newest first
    snapshots.sort_by(|a, b| b.1.cmp(&a.1));

    let mut deleted = Vec::new();
    for (path, _) in snapshots.into_iter().skip(keep_count) {
        fs::remove_file(&path)
            .map_err(|e| OptikitError::Io(format!("Failed to delete old backup: {}", e)))?;
        if let Some(name) = path.file_name() {
            logger::info(format!("Cleaned up old backup: {}", name.to_string_lossy()));
        }
        deleted.push(path);
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, contents: &str, secs_after_epoch: u64) {
        fs::write(path, contents).unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
    }

    #[test]
    fn test_snapshot_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 10, 15, 30).unwrap()
            + chrono::Duration::milliseconds(123);
        let name = snapshot_file_name(Path::new("/app/pubspec.lock"), at).unwrap();
        assert_eq!(name, "pubspec_2024-03-02T10-15-30-123Z.lock");
    }

    #[test]
    fn test_snapshot_file_name_without_extension() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let name = snapshot_file_name(Path::new("ios/Podfile"), at).unwrap();
        assert_eq!(name, "Podfile_2024-01-05T00-00-00-000Z");
    }

    #[test]
    fn test_backup_dir_is_sibling() {
        assert_eq!(
            backup_dir_for(Path::new("/app/ios/Podfile.lock")),
            PathBuf::from("/app/ios/.optikit-backup")
        );
    }

    #[test]
    fn test_create_backup_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("pubspec.lock");

        assert!(create_backup(&missing).unwrap().is_none());
        assert!(!temp.path().join(BACKUP_DIR_NAME).exists());
    }

    #[test]
    fn test_create_backup_copies_and_keeps_original() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("pubspec.lock");
        fs::write(&file, "packages: {}").unwrap();

        let backup = create_backup(&file).unwrap().unwrap();

        assert!(file.exists());
        assert_eq!(backup.parent().unwrap(), temp.path().join(BACKUP_DIR_NAME));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "packages: {}");
        let name = backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("pubspec_"));
        assert!(name.ends_with("Z.lock"));
    }

    #[test]
    fn test_backup_then_restore_round_trip() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Info.plist");
        let original = b"<plist>\x00\xffbinary-ish</plist>".to_vec();
        fs::write(&file, &original).unwrap();

        let backup = create_backup(&file).unwrap().unwrap();
        fs::write(&file, "clobbered").unwrap();

        assert!(restore_backup(&file, &backup).unwrap());
        assert_eq!(fs::read(&file).unwrap(), original);
    }

    #[test]
    fn test_restore_recreates_deleted_original() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("pubspec.lock");
        fs::write(&file, "lock").unwrap();

        let backup = create_backup(&file).unwrap().unwrap();
        fs::remove_file(&file).unwrap();

        assert!(restore_backup(&file, &backup).unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), "lock");
    }

    #[test]
    fn test_restore_missing_backup_returns_false() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("pubspec.lock");
        fs::write(&file, "current").unwrap();

        let restored = restore_backup(&file, &temp.path().join("gone.lock")).unwrap();
        assert!(!restored);
        assert_eq!(fs::read_to_string(&file).unwrap(), "current");
    }

    #[test]
    fn test_cleanup_keeps_most_recent() {
        let temp = TempDir::new().unwrap();
        let backup_dir = temp.path().join(BACKUP_DIR_NAME);
        fs::create_dir_all(&backup_dir).unwrap();

        for i in 0..5u64 {
            write_with_mtime(
                &backup_dir.join(format!("pubspec_{}.lock", i)),
                "x",
                1_700_000_000 + i * 60,
            );
        }

        let deleted = cleanup_backups(temp.path(), 2).unwrap();
        assert_eq!(deleted.len(), 3);

        let mut remaining: Vec<String> = fs::read_dir(&backup_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec!["pubspec_3.lock", "pubspec_4.lock"]);
    }

    #[test]
    fn test_cleanup_under_limit_deletes_nothing() {
        let temp = TempDir::new().unwrap();
        let backup_dir = temp.path().join(BACKUP_DIR_NAME);
        fs::create_dir_all(&backup_dir).unwrap();
        fs::write(backup_dir.join("a_1.txt"), "a").unwrap();

        assert!(cleanup_backups(temp.path(), 5).unwrap().is_empty());
        assert!(backup_dir.join("a_1.txt").exists());
    }

    #[test]
    fn test_cleanup_without_backup_dir() {
        let temp = TempDir::new().unwrap();
        assert!(cleanup_backups(temp.path(), 5).unwrap().is_empty());
    }
}
