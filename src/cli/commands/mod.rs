//! CLI commands for Relic.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// List every file tracked by the store.
pub mod files;

/// Start the MCP server on stdio.
pub mod mcp;

/// Restore a file to one of its snapshots.
pub mod restore;

/// Search snapshot content.
pub mod search;

/// Display one file's snapshot timeline.
pub mod show;

/// Show store statistics.
pub mod stats;
