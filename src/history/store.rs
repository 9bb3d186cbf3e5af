//! Local History store location and reading.
//!
//! The editors keep their snapshot store under the user data directory:
//!
//! - macOS: `~/Library/Application Support/{Cursor,Code}/User/History`
//! - Linux: `~/.config/{Cursor,Code}/User/History`
//! - Windows: `%APPDATA%/{Cursor,Code}/User/History`
//!
//! Each immediate subdirectory of the root tracks one original file and
//! is named by an opaque hash. Inside it, `entries.json` records the
//! original file's identity under a `resource` field, and every other
//! file is one snapshot whose modification time defines its place in
//! the timeline.
//!
//! The editor writes this store concurrently with our reads, so a
//! half-written descriptor or snapshot is an expected state: unreadable
//! directories and files are skipped (with a debug log), never raised.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

use crate::uri::{normalize_path, uri_to_path};

use super::models::{FileHistory, HistoryEntry, HistoryStats};

/// Name of the per-directory metadata descriptor.
const ENTRIES_FILE: &str = "entries.json";

/// Errors raised while resolving the store location.
///
/// These are configuration faults, not operational outcomes: an
/// unrecognized host OS has no sensible store root to fall back to,
/// so resolution fails immediately at construction.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported platform for Local History discovery: {0}")]
    UnsupportedPlatform(String),

    #[error("could not determine the user data directory")]
    UserDataDirUnavailable,
}

/// The metadata descriptor as written by the editor.
///
/// Only `resource` matters to us; the editor also records a format
/// version and its own entry bookkeeping, which serde skips.
#[derive(Debug, Deserialize)]
struct EntriesMetadata {
    resource: String,
}

/// Read access to one resolved Local History store.
///
/// The root is resolved once at construction and held for the store's
/// lifetime. Every query re-scans the directory tree, so a store that
/// appears after construction is picked up by existence checks and
/// listings without a new instance.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    root: PathBuf,
}

impl HistoryStore {
    /// Locates the store by OS convention.
    ///
    /// Prefers Cursor's store when it exists on disk, falls back to
    /// VS Code's, and defaults to the (absent) Cursor path otherwise so
    /// that later existence checks report honestly.
    pub fn locate() -> Result<Self, StoreError> {
        let root = resolve_history_root(std::env::consts::OS)?;
        Ok(Self { root })
    }

    /// Opens a store at an explicit root. Used by tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The resolved store root (which may not exist on disk).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the resolved root currently exists.
    pub fn history_directory_exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Lists the per-file snapshot directories under the root.
    ///
    /// Returns an empty list when the root is missing or unreadable;
    /// read failures are logged and swallowed so a broken store never
    /// aborts a listing.
    pub fn history_directories(&self) -> Vec<PathBuf> {
        let reader = match std::fs::read_dir(&self.root) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!("Cannot list history root {}: {e}", self.root.display());
                return Vec::new();
            }
        };

        let mut dirs = Vec::new();
        for entry in reader {
            match entry {
                Ok(entry) if entry.path().is_dir() => dirs.push(entry.path()),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping unreadable store entry: {e}"),
            }
        }
        dirs
    }

    /// Reconstructs the timeline held in one snapshot directory.
    ///
    /// Returns `None` when the descriptor is missing, unparseable, or
    /// lacks a `resource` field; the editor writes this store while we
    /// read it, so those are expected transient states. Individual
    /// snapshot files that cannot be read are skipped. A directory with
    /// valid metadata but no readable snapshots still yields a history,
    /// with an empty entry list.
    pub fn file_history(&self, dir: &Path) -> Option<FileHistory> {
        let descriptor = dir.join(ENTRIES_FILE);
        let raw = match std::fs::read_to_string(&descriptor) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("No readable descriptor in {}: {e}", dir.display());
                return None;
            }
        };

        let metadata: EntriesMetadata = match serde_json::from_str(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Invalid descriptor in {}: {e}", dir.display());
                return None;
            }
        };

        let mut snapshot_paths = Vec::new();
        let reader = match std::fs::read_dir(dir) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!("Cannot list snapshot directory {}: {e}", dir.display());
                return None;
            }
        };
        for entry in reader.flatten() {
            let path = entry.path();
            if path.is_file() && entry.file_name() != ENTRIES_FILE {
                snapshot_paths.push(path);
            }
        }
        // Name order for deterministic iteration only; chronology comes
        // from the timestamp sort below.
        snapshot_paths.sort();

        let mut entries: Vec<HistoryEntry> = snapshot_paths
            .iter()
            .filter_map(|path| read_snapshot(path))
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Some(FileHistory {
            original_file_path: metadata.resource,
            entries,
        })
    }

    /// Reconstructs every timeline in the store.
    ///
    /// Cross-file order follows the OS directory listing; directories
    /// without valid metadata are dropped.
    pub fn all_file_histories(&self) -> Vec<FileHistory> {
        self.history_directories()
            .iter()
            .filter_map(|dir| self.file_history(dir))
            .collect()
    }

    /// Finds the timeline for a given original file path or URI.
    ///
    /// Both sides are decoded from URI form and lexically normalized
    /// before comparison. All histories are checked for an exact match
    /// before any case-insensitive comparison is attempted, so on
    /// case-sensitive filesystems an exact match is never shadowed by
    /// a case-insensitive collision earlier in the scan.
    pub fn find_history_by_file_path(&self, target: &str) -> Option<FileHistory> {
        let wanted = normalized_identity(target);
        let histories = self.all_file_histories();

        if let Some(found) = histories
            .iter()
            .find(|h| normalized_identity(&h.original_file_path) == wanted)
        {
            return Some(found.clone());
        }

        let wanted_lower = wanted.to_lowercase();
        histories
            .into_iter()
            .find(|h| normalized_identity(&h.original_file_path).to_lowercase() == wanted_lower)
    }

    /// Computes aggregate counts from a fresh scan.
    pub fn history_stats(&self) -> HistoryStats {
        let histories = self.all_file_histories();
        HistoryStats {
            total_files: histories.len(),
            total_entries: histories.iter().map(|h| h.entries.len()).sum(),
            history_dir_exists: self.history_directory_exists(),
            history_dir_path: self.root.clone(),
        }
    }
}

/// Normalizes a path-or-URI identity to its comparable form.
fn normalized_identity(input: &str) -> String {
    normalize_path(Path::new(&uri_to_path(input)))
        .to_string_lossy()
        .into_owned()
}

/// Reads one snapshot file into an entry.
///
/// Returns `None` (with a debug log) when the file's metadata or
/// content cannot be read; a single bad snapshot never aborts its
/// directory.
fn read_snapshot(path: &Path) -> Option<HistoryEntry> {
    let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            tracing::debug!("Skipping snapshot {}: {e}", path.display());
            return None;
        }
    };
    let timestamp = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Skipping snapshot {}: {e}", path.display());
            return None;
        }
    };

    Some(HistoryEntry {
        timestamp,
        content,
        file_path: path.to_path_buf(),
        relative_path: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })
}

/// Resolves the store root for the given OS family.
fn resolve_history_root(os: &str) -> Result<PathBuf, StoreError> {
    let (cursor, code) = candidate_roots(os)?;
    if cursor.is_dir() {
        Ok(cursor)
    } else if code.is_dir() {
        Ok(code)
    } else {
        Ok(cursor)
    }
}

/// Computes the (Cursor, Code) candidate roots for an OS family.
fn candidate_roots(os: &str) -> Result<(PathBuf, PathBuf), StoreError> {
    let base = match os {
        "macos" => dirs::home_dir()
            .ok_or(StoreError::UserDataDirUnavailable)?
            .join("Library/Application Support"),
        "linux" => dirs::home_dir()
            .ok_or(StoreError::UserDataDirUnavailable)?
            .join(".config"),
        // dirs::config_dir resolves %APPDATA% on Windows
        "windows" => dirs::config_dir().ok_or(StoreError::UserDataDirUnavailable)?,
        other => return Err(StoreError::UnsupportedPlatform(other.to_string())),
    };

    Ok((
        base.join("Cursor").join("User").join("History"),
        base.join("Code").join("User").join("History"),
    ))
}
