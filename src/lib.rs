//! Relic - Local History browser and restorer
//!
//! Relic reads the Local History snapshot store maintained by VS Code
//! and Cursor, reconstructs per-file timelines, and exposes them for
//! lookup, search, and restoration.

pub mod history;
pub mod uri;
