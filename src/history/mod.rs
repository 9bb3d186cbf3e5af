//! The Local History store reader.
//!
//! VS Code and Cursor keep a per-file snapshot store under their user
//! data directory. Each tracked file owns one hash-named subdirectory
//! containing an `entries.json` descriptor plus one opaque snapshot
//! file per saved revision. This module locates the store, rebuilds
//! ordered timelines from it, and implements search and restoration
//! on top of that view.
//!
//! The store is owned by the editor; every query here is a fresh scan
//! so external writes are always picked up and never require cache
//! invalidation.

pub mod models;
pub mod restore;
pub mod search;
pub mod store;

pub use models::{FileHistory, HistoryEntry, HistoryStats, SearchMatch};
pub use restore::{restore_from_history, RestoreOutcome};
pub use search::search_history_content;
pub use store::{HistoryStore, StoreError};
