//! Project-wide snapshot discovery
//!
//! Listing and restoring both rescan the filesystem. An index shown by one
//! listing therefore only addresses the same snapshot as long as no snapshot
//! is created or deleted in between.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::config::paths::BACKUP_DIR_NAME;
use crate::error::{OptikitError, OptikitResult};

/// One stored snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// Location of the snapshot file
    pub backup_path: PathBuf,
    /// File the snapshot restores to
    pub original_path: PathBuf,
    /// Snapshot modification time
    pub timestamp: DateTime<Utc>,
    /// Snapshot size in bytes
    pub size: u64,
}

/// All snapshots of one original file, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupGroup {
    pub original_path: PathBuf,
    pub entries: Vec<BackupEntry>,
}

/// Numbered view over every snapshot below a root
#[derive(Debug, Clone, Default)]
pub struct BackupCatalog {
    groups: Vec<BackupGroup>,
}

impl BackupCatalog {
    /// Scan `root` and build the grouped listing
    pub fn scan(root: &Path) -> OptikitResult<Self> {
        Ok(Self::from_entries(find_all_backups(root)?))
    }

    /// Group entries by original path in first-seen order and sort each group
    /// newest first
    pub fn from_entries(entries: Vec<BackupEntry>) -> Self {
        let mut groups: Vec<BackupGroup> = Vec::new();

        for entry in entries {
            match groups
                .iter_mut()
                .find(|group| group.original_path == entry.original_path)
            {
                Some(group) => group.entries.push(entry),
                None => groups.push(BackupGroup {
                    original_path: entry.original_path.clone(),
                    entries: vec![entry],
                }),
            }
        }

        for group in &mut groups {
            group
                .entries
                .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[BackupGroup] {
        &self.groups
    }

    /// Total number of snapshots
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshots paired with their 1-based display index
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &BackupEntry)> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter())
            .enumerate()
            .map(|(i, entry)| (i + 1, entry))
    }

    /// Snapshot shown as `[index]` in the listing
    pub fn get(&self, index: usize) -> OptikitResult<&BackupEntry> {
        index
            .checked_sub(1)
            .and_then(|position| self.numbered().nth(position))
            .map(|(_, entry)| entry)
            .ok_or(OptikitError::InvalidIndex {
                listing: "backup",
                index,
                max: self.len(),
            })
    }
}

/// Every file directly inside a `.optikit-backup` folder below `root`.
///
/// Hidden directories other than the backup folders and `node_modules` are
/// not descended into. Siblings are visited in file-name order.
pub fn find_all_backups(root: &Path) -> OptikitResult<Vec<BackupEntry>> {
    let mut backups = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(should_visit);

    for entry in walker {
        let entry = entry
            .map_err(|e| OptikitError::Io(format!("Failed to scan for backups: {}", e)))?;

        if !entry.file_type().is_file() || !is_in_backup_dir(entry.path()) {
            continue;
        }

        let metadata = fs::metadata(entry.path())?;
        backups.push(BackupEntry {
            backup_path: entry.path().to_path_buf(),
            original_path: original_path_for(entry.path())?,
            timestamp: DateTime::<Utc>::from(metadata.modified()?),
            size: metadata.len(),
        });
    }

    Ok(backups)
}

fn should_visit(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }

    let name = entry.file_name().to_string_lossy();
    name == BACKUP_DIR_NAME || (!name.starts_with('.') && name != "node_modules")
}

fn is_in_backup_dir(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .map_or(false, |name| name == BACKUP_DIR_NAME)
}

/// Recover the original file path from a snapshot path.
///
/// The timestamp suffix is stripped from the name and the result placed one
/// level above the backup folder. Names that do not carry a recognizable
/// timestamp and extension are restored under their own name.
pub fn original_path_for(backup: &Path) -> OptikitResult<PathBuf> {
    let backup_dir = backup.parent().unwrap_or_else(|| Path::new(""));
    let original_dir = backup_dir.parent().unwrap_or_else(|| Path::new(""));
    let file_name = backup
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let re = Regex::new(r"^(.+)_\d{4}-\d{2}-\d{2}T[\d-]+Z(\.\w+)$")?;
    let restored_name = match re.captures(&file_name) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => file_name,
    };

    Ok(original_dir.join(restored_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn snapshot(dir: &Path, name: &str, secs_after_epoch: u64) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, name).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .unwrap();
        path
    }

    #[test]
    fn test_original_path_strips_timestamp() {
        let original = original_path_for(Path::new(
            "/app/.optikit-backup/pubspec_2024-03-02T10-15-30-123Z.lock",
        ))
        .unwrap();
        assert_eq!(original, PathBuf::from("/app/pubspec.lock"));
    }

    #[test]
    fn test_original_path_keeps_underscores_in_stem() {
        let original = original_path_for(Path::new(
            "/app/lib/.optikit-backup/home_screen_2024-03-02T10-15-30-123Z.dart",
        ))
        .unwrap();
        assert_eq!(original, PathBuf::from("/app/lib/home_screen.dart"));
    }

    #[test]
    fn test_original_path_fallback_for_unrecognized_name() {
        let original = original_path_for(Path::new(
            "/app/ios/.optikit-backup/Podfile_2024-03-02T10-15-30-123Z",
        ))
        .unwrap();
        assert_eq!(
            original,
            PathBuf::from("/app/ios/Podfile_2024-03-02T10-15-30-123Z")
        );
    }

    #[test]
    fn test_find_all_backups_groups_newest_first() {
        let temp = TempDir::new().unwrap();
        let backup_dir = temp.path().join(BACKUP_DIR_NAME);
        snapshot(&backup_dir, "a_2024-01-01T00-00-00-000Z.txt", 1_000);
        snapshot(&backup_dir, "a_2024-01-03T00-00-00-000Z.txt", 3_000);
        snapshot(&backup_dir, "a_2024-01-02T00-00-00-000Z.txt", 2_000);
        snapshot(&backup_dir, "b_2024-01-01T00-00-00-000Z.txt", 1_500);
        snapshot(&backup_dir, "b_2024-01-02T00-00-00-000Z.txt", 2_500);

        let entries = find_all_backups(temp.path()).unwrap();
        assert_eq!(entries.len(), 5);

        let catalog = BackupCatalog::from_entries(entries);
        assert_eq!(catalog.groups().len(), 2);

        let a = &catalog.groups()[0];
        assert_eq!(a.original_path, temp.path().join("a.txt"));
        assert_eq!(a.entries.len(), 3);
        assert!(a.entries.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let b = &catalog.groups()[1];
        assert_eq!(b.original_path, temp.path().join("b.txt"));
        assert_eq!(b.entries.len(), 2);
        assert!(b.entries[0].timestamp > b.entries[1].timestamp);
    }

    #[test]
    fn test_entry_reports_size() {
        let temp = TempDir::new().unwrap();
        let name = "pubspec_2024-01-01T00-00-00-000Z.lock";
        snapshot(&temp.path().join(BACKUP_DIR_NAME), name, 10);

        let entries = find_all_backups(temp.path()).unwrap();
        assert_eq!(entries[0].size, name.len() as u64);
    }

    #[test]
    fn test_scan_skips_hidden_and_node_modules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        snapshot(&root.join("ios").join(BACKUP_DIR_NAME), "Podfile_2024-01-01T00-00-00-000Z.lock", 10);
        snapshot(
            &root.join(".dart_tool").join(BACKUP_DIR_NAME),
            "x_2024-01-01T00-00-00-000Z.json",
            10,
        );
        snapshot(
            &root.join("node_modules").join(BACKUP_DIR_NAME),
            "y_2024-01-01T00-00-00-000Z.json",
            10,
        );
        // Plain files outside backup folders are not snapshots.
        snapshot(root, "pubspec_2024-01-01T00-00-00-000Z.yaml", 10);

        let entries = find_all_backups(root).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_path, root.join("ios").join("Podfile.lock"));
    }

    #[test]
    fn test_index_addresses_grouped_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        snapshot(&root.join(BACKUP_DIR_NAME), "pubspec_2024-01-01T00-00-00-000Z.lock", 100);
        snapshot(&root.join(BACKUP_DIR_NAME), "pubspec_2024-01-02T00-00-00-000Z.lock", 200);
        let newest_podfile = snapshot(
            &root.join("ios").join(BACKUP_DIR_NAME),
            "Podfile_2024-01-03T00-00-00-000Z.lock",
            300,
        );

        let catalog = BackupCatalog::scan(root).unwrap();
        assert_eq!(catalog.len(), 3);

        // Root-level `.optikit-backup` sorts before `ios` by name.
        let first = catalog.get(1).unwrap();
        assert_eq!(first.original_path, root.join("pubspec.lock"));
        assert!(first.backup_path.ends_with("pubspec_2024-01-02T00-00-00-000Z.lock"));

        assert_eq!(catalog.get(3).unwrap().backup_path, newest_podfile);

        for index in [0, 4] {
            match catalog.get(index) {
                Err(OptikitError::InvalidIndex { index: got, max, .. }) => {
                    assert_eq!(got, index);
                    assert_eq!(max, 3);
                }
                other => panic!("unexpected result for {}: {:?}", index, other),
            }
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let catalog = BackupCatalog::default();
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.get(1),
            Err(OptikitError::InvalidIndex { max: 0, .. })
        ));
    }

    #[test]
    fn test_index_shifts_when_snapshots_change() {
        // Indices are recomputed on every scan, so a snapshot created between
        // listing and restoring changes what an index points at.
        let temp = TempDir::new().unwrap();
        let backup_dir = temp.path().join(BACKUP_DIR_NAME);
        snapshot(&backup_dir, "a_2024-01-01T00-00-00-000Z.txt", 100);
        let listed = BackupCatalog::scan(temp.path()).unwrap().get(1).unwrap().clone();

        snapshot(&backup_dir, "a_2024-01-02T00-00-00-000Z.txt", 200);
        let rescanned = BackupCatalog::scan(temp.path()).unwrap();

        assert_ne!(rescanned.get(1).unwrap().backup_path, listed.backup_path);
        assert_eq!(rescanned.get(2).unwrap().backup_path, listed.backup_path);
    }
}
