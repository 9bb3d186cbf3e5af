//! MCP server implementation for Relic.
//!
//! Runs an MCP server on stdio transport, exposing the Local History
//! store to AI coding assistants.

use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, Implementation, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
    transport::stdio,
    ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::future::Future;
use std::path::Path;

use crate::history::{
    models::format_timestamp, restore_from_history, search_history_content, HistoryStore,
    RestoreOutcome,
};
use crate::uri::uri_to_path;

// ============== Tool Parameter Types ==============

/// Parameters for the get_file_history tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFileHistoryParams {
    /// Absolute path of the original file.
    #[schemars(description = "Absolute path of the file whose history to fetch")]
    pub file_path: String,
}

/// Parameters for the get_history_entry tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetHistoryEntryParams {
    /// Absolute path of the original file.
    #[schemars(description = "Absolute path of the file whose history to fetch")]
    pub file_path: String,

    /// Index of the entry to fetch (0 = most recent).
    #[schemars(description = "Entry index within the timeline (0 = most recent)")]
    pub entry_index: usize,
}

/// Parameters for the restore_from_history tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RestoreParams {
    /// Absolute path of the file to restore.
    #[schemars(description = "Absolute path of the file to restore")]
    pub file_path: String,

    /// Index of the entry to restore (0 = most recent).
    #[schemars(description = "Entry index to restore (0 = most recent)")]
    pub entry_index: usize,

    /// Whether to back up the current content first.
    #[schemars(description = "Back up the current file content first (default: true)")]
    pub create_backup: Option<bool>,
}

/// Parameters for the search_history_content tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The text to search for.
    #[schemars(description = "Text to search for in snapshot content (literal, not regex)")]
    pub term: String,

    /// Whether matching is case-sensitive.
    #[schemars(description = "Match case-sensitively (default: false)")]
    pub case_sensitive: Option<bool>,
}

// ============== Result Types ==============

/// One tracked file in a listing.
#[derive(Debug, Serialize)]
pub struct HistoryFileInfo {
    pub path: String,
    pub entry_count: usize,
    pub most_recent: Option<String>,
}

/// Listing of every tracked file.
#[derive(Debug, Serialize)]
pub struct ListHistoryFilesResponse {
    pub total_files: usize,
    pub files: Vec<HistoryFileInfo>,
}

/// One entry in a timeline listing.
#[derive(Debug, Serialize)]
pub struct EntryInfo {
    pub index: usize,
    pub timestamp: String,
    pub timestamp_ms: i64,
    pub snapshot_name: String,
    pub size_bytes: usize,
}

/// Full timeline response for one file.
#[derive(Debug, Serialize)]
pub struct FileHistoryResponse {
    pub path: String,
    pub found: bool,
    pub message: Option<String>,
    pub entries: Vec<EntryInfo>,
}

/// One snapshot's content.
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub path: String,
    pub found: bool,
    pub message: Option<String>,
    pub entry_index: Option<usize>,
    pub timestamp: Option<String>,
    pub content: Option<String>,
}

/// Search results response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub term: String,
    pub case_sensitive: bool,
    pub total_matches: usize,
    pub matches: Vec<crate::history::SearchMatch>,
}

// ============== Server Implementation ==============

/// The Relic MCP server.
///
/// Provides tools for querying and restoring Local History snapshots.
#[derive(Debug, Clone)]
pub struct RelicServer {
    tool_router: ToolRouter<RelicServer>,
}

impl RelicServer {
    /// Creates a new RelicServer.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for RelicServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates an internal-error McpError from an error message.
fn mcp_error(message: &str) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(message.to_string()),
        data: None,
    }
}

/// Creates an invalid-params McpError from an error message.
fn invalid_params(message: &str) -> McpError {
    McpError {
        code: ErrorCode(-32602),
        message: Cow::from(message.to_string()),
        data: None,
    }
}

/// Opens the history store, mapping location failures to MCP errors.
fn open_store() -> Result<HistoryStore, McpError> {
    HistoryStore::locate().map_err(|e| mcp_error(&format!("Cannot locate history store: {e}")))
}

/// Rejects file paths that are not absolute after URI decoding.
fn require_absolute(file_path: &str) -> Result<(), McpError> {
    let decoded = uri_to_path(file_path);
    if Path::new(&decoded).is_absolute() {
        Ok(())
    } else {
        Err(invalid_params(&format!(
            "file_path must be absolute, got: {file_path}"
        )))
    }
}

/// Serializes a response into a successful tool result.
fn json_result<T: Serialize>(response: &T) -> CallToolResult {
    let json = serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!("Error serializing response: {e}"));
    CallToolResult::success(vec![Content::text(json)])
}

#[tool_router]
impl RelicServer {
    /// List every file tracked by the Local History store.
    ///
    /// Returns each tracked file's path, its snapshot count, and the
    /// time of its most recent snapshot.
    #[tool(description = "List all files tracked by the editor's Local History store")]
    async fn list_history_files(&self) -> Result<CallToolResult, McpError> {
        let store = open_store()?;
        Ok(json_result(&list_history_files_impl(&store)))
    }

    /// Get the full snapshot timeline for one file.
    ///
    /// Entries are ordered newest-first; a path with no recorded
    /// history comes back as a found=false response, not an error.
    #[tool(description = "Get the ordered snapshot timeline for a file path")]
    async fn get_file_history(
        &self,
        Parameters(params): Parameters<GetFileHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        require_absolute(&params.file_path)?;
        let store = open_store()?;
        Ok(json_result(&get_file_history_impl(&store, &params)))
    }

    /// Get one snapshot's full content and timestamp.
    #[tool(description = "Get one history entry's content by file path and index")]
    async fn get_history_entry(
        &self,
        Parameters(params): Parameters<GetHistoryEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        require_absolute(&params.file_path)?;
        let store = open_store()?;
        Ok(json_result(&get_history_entry_impl(&store, &params)))
    }

    /// Restore a snapshot back to the original file.
    ///
    /// By default the current content is first copied to a timestamped
    /// backup next to the target.
    #[tool(description = "Restore a file to one of its Local History snapshots")]
    async fn restore_from_history(
        &self,
        Parameters(params): Parameters<RestoreParams>,
    ) -> Result<CallToolResult, McpError> {
        require_absolute(&params.file_path)?;
        let store = open_store()?;
        let outcome: RestoreOutcome = restore_from_history(
            &store,
            &params.file_path,
            params.entry_index,
            params.create_backup.unwrap_or(true),
        );
        Ok(json_result(&outcome))
    }

    /// Get aggregate statistics for the store.
    #[tool(description = "Get aggregate Local History store statistics")]
    async fn get_history_stats(&self) -> Result<CallToolResult, McpError> {
        let store = open_store()?;
        Ok(json_result(&store.history_stats()))
    }

    /// Search every snapshot's content for a literal term.
    #[tool(description = "Search all Local History snapshot content for a term")]
    async fn search_history_content(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = open_store()?;
        let case_sensitive = params.case_sensitive.unwrap_or(false);
        match search_history_content(&store, &params.term, case_sensitive) {
            Ok(matches) => Ok(json_result(&SearchResponse {
                term: params.term,
                case_sensitive,
                total_matches: matches.len(),
                matches,
            })),
            Err(e) => Err(mcp_error(&format!("Search failed: {e}"))),
        }
    }
}

#[tool_handler]
impl ServerHandler for RelicServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Relic exposes the Local History snapshot store written by VS Code and \
                 Cursor. Use these tools to list tracked files, inspect and search \
                 snapshot timelines, and restore a file to an earlier revision."
                    .to_string(),
            ),
        }
    }
}

// ============== Implementation Functions ==============

/// Implementation of the list_history_files tool.
fn list_history_files_impl(store: &HistoryStore) -> ListHistoryFilesResponse {
    let files: Vec<HistoryFileInfo> = store
        .all_file_histories()
        .into_iter()
        .map(|h| HistoryFileInfo {
            entry_count: h.entries.len(),
            most_recent: h.most_recent_timestamp().map(format_timestamp),
            path: h.original_file_path,
        })
        .collect();

    ListHistoryFilesResponse {
        total_files: files.len(),
        files,
    }
}

/// Implementation of the get_file_history tool.
fn get_file_history_impl(store: &HistoryStore, params: &GetFileHistoryParams) -> FileHistoryResponse {
    match store.find_history_by_file_path(&params.file_path) {
        Some(history) => FileHistoryResponse {
            path: params.file_path.clone(),
            found: true,
            message: None,
            entries: history
                .entries
                .iter()
                .enumerate()
                .map(|(index, e)| EntryInfo {
                    index,
                    timestamp: format_timestamp(e.timestamp),
                    timestamp_ms: e.timestamp,
                    snapshot_name: e.relative_path.clone(),
                    size_bytes: e.content.len(),
                })
                .collect(),
        },
        None => FileHistoryResponse {
            path: params.file_path.clone(),
            found: false,
            message: Some(format!("No history found for {}", params.file_path)),
            entries: Vec::new(),
        },
    }
}

/// Implementation of the get_history_entry tool.
fn get_history_entry_impl(store: &HistoryStore, params: &GetHistoryEntryParams) -> HistoryEntryResponse {
    let not_found = |message: String| HistoryEntryResponse {
        path: params.file_path.clone(),
        found: false,
        message: Some(message),
        entry_index: None,
        timestamp: None,
        content: None,
    };

    let Some(history) = store.find_history_by_file_path(&params.file_path) else {
        return not_found(format!("No history found for {}", params.file_path));
    };

    match history.entries.get(params.entry_index) {
        Some(entry) => HistoryEntryResponse {
            path: params.file_path.clone(),
            found: true,
            message: None,
            entry_index: Some(params.entry_index),
            timestamp: Some(format_timestamp(entry.timestamp)),
            content: Some(entry.content.clone()),
        },
        None => not_found(format!(
            "Entry index {} is out of range; valid range is 0..{}",
            params.entry_index,
            history.entries.len()
        )),
    }
}

/// Runs the MCP server on stdio transport.
///
/// This is a blocking call that processes MCP requests until the client
/// disconnects or an error occurs.
pub async fn run_server() -> Result<()> {
    let service = RelicServer::new().serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    fn write_snapshot_dir(
        root: &std::path::Path,
        hash: &str,
        resource: &str,
        snapshots: &[(&str, &str, u64)],
    ) {
        let dir = root.join(hash);
        fs::create_dir_all(&dir).expect("create snapshot dir");
        fs::write(
            dir.join("entries.json"),
            format!(r#"{{"version":1,"resource":"{resource}","entries":[]}}"#),
        )
        .expect("write descriptor");
        for (name, content, millis) in snapshots {
            let path = dir.join(name);
            fs::write(&path, content).expect("write snapshot");
            let file = File::options().write(true).open(&path).expect("reopen");
            file.set_modified(UNIX_EPOCH + Duration::from_millis(*millis))
                .expect("set mtime");
        }
    }

    #[test]
    fn test_require_absolute_accepts_paths_and_uris() {
        assert!(require_absolute("/a/b.txt").is_ok());
        assert!(require_absolute("file:///a/b.txt").is_ok());
    }

    #[test]
    fn test_require_absolute_rejects_relative() {
        let err = require_absolute("relative/b.txt").expect_err("relative must be rejected");
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_list_history_files_impl() {
        let dir = tempdir().expect("tempdir");
        write_snapshot_dir(
            dir.path(),
            "aaaa01",
            "file:///a.txt",
            &[("s1", "one", 1_000), ("s2", "two", 2_000)],
        );
        let store = HistoryStore::with_root(dir.path());

        let response = list_history_files_impl(&store);
        assert_eq!(response.total_files, 1);
        assert_eq!(response.files[0].path, "file:///a.txt");
        assert_eq!(response.files[0].entry_count, 2);
        assert!(response.files[0].most_recent.is_some());
    }

    #[test]
    fn test_get_file_history_impl_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = HistoryStore::with_root(dir.path());

        let response = get_file_history_impl(
            &store,
            &GetFileHistoryParams {
                file_path: "/no/such.txt".to_string(),
            },
        );
        assert!(!response.found);
        assert!(response.entries.is_empty());
        assert!(response.message.expect("message").contains("No history found"));
    }

    #[test]
    fn test_get_history_entry_impl_found() {
        let dir = tempdir().expect("tempdir");
        write_snapshot_dir(dir.path(), "aaaa01", "file:///a.txt", &[("s1", "body", 1_000)]);
        let store = HistoryStore::with_root(dir.path());

        let response = get_history_entry_impl(
            &store,
            &GetHistoryEntryParams {
                file_path: "/a.txt".to_string(),
                entry_index: 0,
            },
        );
        assert!(response.found);
        assert_eq!(response.content.as_deref(), Some("body"));
    }

    #[test]
    fn test_get_history_entry_impl_out_of_range() {
        let dir = tempdir().expect("tempdir");
        write_snapshot_dir(dir.path(), "aaaa01", "file:///a.txt", &[("s1", "body", 1_000)]);
        let store = HistoryStore::with_root(dir.path());

        let response = get_history_entry_impl(
            &store,
            &GetHistoryEntryParams {
                file_path: "/a.txt".to_string(),
                entry_index: 999,
            },
        );
        assert!(!response.found);
        assert!(response.message.expect("message").contains("out of range"));
    }
}
