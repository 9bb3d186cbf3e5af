//! Data model for snapshot timelines.

use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// One historical snapshot of a file.
///
/// Entries are value objects: they are rebuilt from disk on every scan
/// and two scans of the same store compare equal field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Snapshot creation time, milliseconds since the Unix epoch.
    /// Taken from the snapshot file's modification time; this is the
    /// sole ordering key.
    pub timestamp: i64,

    /// Full text content of the snapshot.
    pub content: String,

    /// Absolute location of the snapshot file itself (not the
    /// original file it was taken from).
    pub file_path: PathBuf,

    /// The snapshot file's name within its directory. Assigned by the
    /// editor and opaque; lexical order carries no chronology.
    pub relative_path: String,
}

/// The complete timeline for one tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHistory {
    /// Identity of the original file as recorded by the editor,
    /// usually a `file://` URI but occasionally a bare path.
    pub original_file_path: String,

    /// Snapshots ordered newest-first by timestamp.
    pub entries: Vec<HistoryEntry>,
}

impl FileHistory {
    /// Timestamp of the most recent snapshot, if any exist.
    pub fn most_recent_timestamp(&self) -> Option<i64> {
        self.entries.first().map(|e| e.timestamp)
    }
}

/// Aggregate view of the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_files: usize,
    pub total_entries: usize,
    pub history_dir_exists: bool,
    pub history_dir_path: PathBuf,
}

/// One entry that matched a content search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Identity of the owning file, as recorded in its metadata.
    pub file_path: String,

    /// Chronological rank of the entry within its file (0 = most recent).
    pub entry_index: usize,

    /// Human-readable snapshot time.
    pub timestamp: String,

    /// Number of occurrences of the search term in the entry.
    pub match_count: usize,
}

/// Formats an epoch-milliseconds timestamp for display.
///
/// Timestamps outside chrono's representable range fall back to the
/// raw number rather than failing.
pub fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{millis}ms"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        // 2024-01-01T00:00:00Z
        assert_eq!(format_timestamp(1_704_067_200_000), "2024-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        let formatted = format_timestamp(i64::MAX);
        assert!(formatted.ends_with("ms"));
    }

    #[test]
    fn test_most_recent_timestamp_empty() {
        let history = FileHistory {
            original_file_path: "file:///a.txt".to_string(),
            entries: Vec::new(),
        };
        assert_eq!(history.most_recent_timestamp(), None);
    }

    #[test]
    fn test_histories_compare_by_value() {
        let make = || FileHistory {
            original_file_path: "file:///a.txt".to_string(),
            entries: vec![HistoryEntry {
                timestamp: 42,
                content: "hello".to_string(),
                file_path: PathBuf::from("/store/abc/xyz.txt"),
                relative_path: "xyz.txt".to_string(),
            }],
        };
        assert_eq!(make(), make());
    }
}
