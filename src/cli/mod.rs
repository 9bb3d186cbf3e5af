//! Command-line interface for Relic.
//!
//! Provides the CLI commands for browsing the Local History store:
//! listing tracked files, viewing and searching timelines, checking
//! store statistics, restoring snapshots, and serving MCP.

/// Individual CLI command implementations.
pub mod commands;

/// Output formatting utilities.
pub mod format;

pub use format::OutputFormat;
