//! MCP (Model Context Protocol) server for Relic.
//!
//! Exposes the Local History store to AI tools via the Model Context
//! Protocol, allowing MCP-compatible assistants to browse snapshot
//! timelines, search their content, and restore earlier revisions.
//!
//! The server runs on stdio transport and implements the following tools:
//! - `list_history_files`: List every tracked file with entry counts
//! - `get_file_history`: Get the full ordered timeline for one file
//! - `get_history_entry`: Get one snapshot's content and timestamp
//! - `restore_from_history`: Write a snapshot back to disk
//! - `get_history_stats`: Aggregate store statistics
//! - `search_history_content`: Search snapshot content for a term

mod server;

pub use server::run_server;
