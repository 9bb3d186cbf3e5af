//! Restoring a historical snapshot back to disk.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::uri::{normalize_path, uri_to_path};

use super::models::format_timestamp;
use super::store::HistoryStore;

/// The result of a restore attempt.
///
/// Restoration failures are operational outcomes, not faults: a missing
/// history, an out-of-range index, or an unwritable target all come back
/// as a non-restored outcome with a narrative message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    pub restored: bool,
    pub message: String,
    pub target_path: Option<PathBuf>,
    pub backup_path: Option<PathBuf>,
}

impl RestoreOutcome {
    fn failure(message: String) -> Self {
        Self {
            restored: false,
            message,
            target_path: None,
            backup_path: None,
        }
    }
}

/// Writes the selected snapshot's content back to the original file.
///
/// The target is the caller-supplied path when it still exists on disk;
/// otherwise the path recorded in the history metadata, which covers
/// files that moved since their history was written. With
/// `create_backup`, the target's current content is first copied to a
/// timestamped sibling so repeated backups never collide.
pub fn restore_from_history(
    store: &HistoryStore,
    file_path: &str,
    entry_index: usize,
    create_backup: bool,
) -> RestoreOutcome {
    let Some(history) = store.find_history_by_file_path(file_path) else {
        return RestoreOutcome::failure(format!("No history found for {file_path}"));
    };

    if entry_index >= history.entries.len() {
        return RestoreOutcome::failure(format!(
            "Entry index {entry_index} is out of range for {file_path}; valid range is 0..{}",
            history.entries.len()
        ));
    }
    let entry = &history.entries[entry_index];

    let requested = normalize_path(Path::new(&uri_to_path(file_path)));
    let target = if requested.exists() {
        requested
    } else {
        normalize_path(Path::new(&uri_to_path(&history.original_file_path)))
    };

    match write_restored(&target, &entry.content, create_backup) {
        Ok(backup_path) => {
            let mut message = format!(
                "Restored {} from snapshot {} ({})",
                target.display(),
                entry_index,
                format_timestamp(entry.timestamp)
            );
            if let Some(ref backup) = backup_path {
                message.push_str(&format!("; previous content backed up to {}", backup.display()));
            }
            RestoreOutcome {
                restored: true,
                message,
                target_path: Some(target),
                backup_path,
            }
        }
        Err(e) => RestoreOutcome {
            restored: false,
            message: format!("Failed to restore {}: {e}", target.display()),
            target_path: Some(target),
            backup_path: None,
        },
    }
}

/// Performs the filesystem side of a restore.
///
/// Creates the target's parent directories, takes the optional backup,
/// then overwrites the target. Returns the backup path when one was
/// written.
fn write_restored(
    target: &Path,
    content: &str,
    create_backup: bool,
) -> std::io::Result<Option<PathBuf>> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let backup_path = if create_backup && target.exists() {
        let backup = backup_path_for(target);
        std::fs::copy(target, &backup)?;
        Some(backup)
    } else {
        None
    };

    std::fs::write(target, content)?;
    Ok(backup_path)
}

/// Derives a timestamped sibling path for a backup.
fn backup_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{name}.backup-{}", Utc::now().timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    /// Builds a store with one tracked file and returns (store root,
    /// workspace dir, tracked file path).
    fn store_with_history(snapshots: &[(&str, &str, u64)]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().expect("tempdir");
        let tracked = dir.path().join("work").join("main.rs");
        fs::create_dir_all(tracked.parent().unwrap()).expect("create workspace");

        let hash_dir = dir.path().join("store").join("ab12cd");
        fs::create_dir_all(&hash_dir).expect("create store");
        fs::write(
            hash_dir.join("entries.json"),
            format!(
                r#"{{"version":1,"resource":"file://{}","entries":[]}}"#,
                tracked.display()
            ),
        )
        .expect("write descriptor");

        for (name, content, millis) in snapshots {
            let path = hash_dir.join(name);
            fs::write(&path, content).expect("write snapshot");
            let file = File::options().write(true).open(&path).expect("reopen");
            file.set_modified(UNIX_EPOCH + Duration::from_millis(*millis))
                .expect("set mtime");
        }

        (dir, tracked)
    }

    #[test]
    fn test_restore_not_found_is_noop() {
        let dir = tempdir().expect("tempdir");
        let store = HistoryStore::with_root(dir.path());

        let outcome = restore_from_history(&store, "/no/such/file.rs", 0, true);
        assert!(!outcome.restored);
        assert!(outcome.message.contains("No history found"));
    }

    #[test]
    fn test_restore_out_of_range_mutates_nothing() {
        let (dir, tracked) = store_with_history(&[("s1", "v1", 1_000), ("s2", "v2", 2_000)]);
        fs::write(&tracked, "current").expect("write current");
        let store = HistoryStore::with_root(dir.path().join("store"));

        let outcome =
            restore_from_history(&store, &tracked.to_string_lossy(), 999, true);

        assert!(!outcome.restored);
        assert!(outcome.message.contains("out of range"));
        assert!(outcome.message.contains("0..2"));
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "current");
        // No backup appeared either
        let siblings: Vec<_> = fs::read_dir(tracked.parent().unwrap())
            .expect("list")
            .collect();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn test_restore_with_backup() {
        let (dir, tracked) = store_with_history(&[("s1", "old content", 1_000)]);
        fs::write(&tracked, "current content").expect("write current");
        let store = HistoryStore::with_root(dir.path().join("store"));

        let outcome = restore_from_history(&store, &tracked.to_string_lossy(), 0, true);

        assert!(outcome.restored, "{}", outcome.message);
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "old content");

        let backup = outcome.backup_path.expect("backup path reported");
        assert!(backup.to_string_lossy().contains(".backup-"));
        assert_eq!(fs::read_to_string(&backup).expect("read backup"), "current content");

        // Exactly one backup per call
        let backups = fs::read_dir(tracked.parent().unwrap())
            .expect("list")
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains(".backup-"))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_restore_without_backup() {
        let (dir, tracked) = store_with_history(&[("s1", "old content", 1_000)]);
        fs::write(&tracked, "current content").expect("write current");
        let store = HistoryStore::with_root(dir.path().join("store"));

        let outcome = restore_from_history(&store, &tracked.to_string_lossy(), 0, false);

        assert!(outcome.restored);
        assert!(outcome.backup_path.is_none());
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "old content");

        let backups = fs::read_dir(tracked.parent().unwrap())
            .expect("list")
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains(".backup-"))
            .count();
        assert_eq!(backups, 0);
    }

    #[test]
    fn test_restore_selects_entry_by_rank() {
        let (dir, tracked) = store_with_history(&[("s1", "oldest", 1_000), ("s2", "newest", 2_000)]);
        let store = HistoryStore::with_root(dir.path().join("store"));

        // Rank 1 is the older snapshot
        let outcome = restore_from_history(&store, &tracked.to_string_lossy(), 1, false);
        assert!(outcome.restored);
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "oldest");
    }

    #[test]
    fn test_restore_target_missing_uses_recorded_path() {
        // The caller asks for a path that no longer exists on disk; the
        // restore lands at the path recorded in the metadata.
        let (dir, tracked) = store_with_history(&[("s1", "recovered", 1_000)]);
        let store = HistoryStore::with_root(dir.path().join("store"));
        assert!(!tracked.exists());

        let outcome = restore_from_history(&store, &tracked.to_string_lossy(), 0, true);

        assert!(outcome.restored, "{}", outcome.message);
        assert!(outcome.backup_path.is_none(), "nothing existed to back up");
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "recovered");
    }

    #[test]
    fn test_restore_write_failure_names_the_target() {
        let dir = tempdir().expect("tempdir");
        // A regular file where the target's parent directory should be,
        // so directory creation fails
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "in the way").expect("write blocker");
        let target = blocked.join("main.rs");

        let hash_dir = dir.path().join("store").join("ab12cd");
        fs::create_dir_all(&hash_dir).expect("create store");
        fs::write(
            hash_dir.join("entries.json"),
            format!(
                r#"{{"version":1,"resource":"file://{}","entries":[]}}"#,
                target.display()
            ),
        )
        .expect("write descriptor");
        fs::write(hash_dir.join("s1"), "snapshot").expect("write snapshot");

        let store = HistoryStore::with_root(dir.path().join("store"));
        let outcome = restore_from_history(&store, &target.to_string_lossy(), 0, true);

        assert!(!outcome.restored);
        assert!(outcome.message.contains("Failed to restore"));
        assert_eq!(outcome.target_path, Some(target));
        assert!(outcome.backup_path.is_none());
    }

    #[test]
    fn test_restore_creates_missing_parent_dirs() {
        let (dir, tracked) = store_with_history(&[("s1", "recovered", 1_000)]);
        fs::remove_dir_all(tracked.parent().unwrap()).expect("remove workspace");
        let store = HistoryStore::with_root(dir.path().join("store"));

        let outcome = restore_from_history(&store, &tracked.to_string_lossy(), 0, false);
        assert!(outcome.restored, "{}", outcome.message);
        assert_eq!(fs::read_to_string(&tracked).expect("read"), "recovered");
    }
}
