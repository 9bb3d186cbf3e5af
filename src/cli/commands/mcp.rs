//! MCP server command.
//!
//! Starts the Model Context Protocol server for exposing the Local
//! History store to AI coding tools.

use anyhow::Result;

/// Arguments for the mcp command.
#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub command: McpCommand,
}

/// MCP subcommands.
#[derive(clap::Subcommand)]
pub enum McpCommand {
    /// Start the MCP server on stdio
    #[command(
        long_about = "Starts the MCP (Model Context Protocol) server on stdio.\n\
        The server reads JSON-RPC requests from stdin and writes responses\n\
        to stdout. This allows AI coding tools to query and restore Local\n\
        History snapshots.\n\n\
        Available tools:\n  \
        - list_history_files: List every tracked file\n  \
        - get_file_history: Get a file's snapshot timeline\n  \
        - get_history_entry: Get one snapshot's content\n  \
        - restore_from_history: Restore a snapshot to disk\n  \
        - get_history_stats: Aggregate store statistics\n  \
        - search_history_content: Search snapshot content"
    )]
    Serve,
}

/// Executes the mcp command.
pub fn run(args: Args) -> Result<()> {
    match args.command {
        McpCommand::Serve => run_serve(),
    }
}

/// Runs the MCP server.
fn run_serve() -> Result<()> {
    // Create a new tokio runtime for the MCP server
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(crate::mcp::run_server())
}
