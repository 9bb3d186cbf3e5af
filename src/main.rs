use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod history;
mod mcp;
mod uri;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "relic")]
#[command(version)]
#[command(about = "Browse, search, and restore VS Code and Cursor Local History snapshots")]
#[command(long_about = "Relic reads the Local History snapshot store that VS Code and\n\
    Cursor maintain for every saved file, reconstructs each file's\n\
    timeline, and lets you inspect, search, and restore old revisions.\n\n\
    The store is discovered by OS convention (Cursor preferred, VS Code\n\
    as fallback) and is only ever read; restores write to your files,\n\
    never into the store.")]
#[command(after_help = "EXAMPLES:\n    \
    relic stats                      Show where the store is and what it holds\n    \
    relic files                      List every tracked file\n    \
    relic show /path/to/file.rs      Show a file's snapshot timeline\n    \
    relic search \"fn main\"           Search all snapshot content\n    \
    relic restore /path/to/file.rs --entry 2\n    \
    relic mcp serve                  Start the MCP server on stdio\n\n\
    For more information about a command, run 'relic <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show store location and aggregate statistics
    #[command(long_about = "Displays the resolved Local History store location, whether it\n\
        exists, and the number of tracked files and snapshots it holds.")]
    Stats(commands::stats::Args),

    /// List every file tracked by the store
    #[command(long_about = "Displays a table of tracked files with snapshot counts and the\n\
        time of each file's most recent snapshot.")]
    Files(commands::files::Args),

    /// Show one file's snapshot timeline or a single snapshot
    #[command(long_about = "Displays the ordered snapshot list for a file, newest first.\n\
        With --entry, prints that snapshot's full content instead.")]
    Show(commands::show::Args),

    /// Search snapshot content for a literal term
    #[command(long_about = "Scans every snapshot of every tracked file for the given text\n\
        and lists the matching entries with their match counts. Matching\n\
        is literal and case-insensitive unless --case-sensitive is given.")]
    Search(commands::search::Args),

    /// Restore a file to one of its snapshots
    #[command(long_about = "Overwrites a file with the content of one of its recorded\n\
        snapshots. The current content is first copied to a timestamped\n\
        backup unless --no-backup is given.")]
    Restore(commands::restore::Args),

    /// Run the MCP server for AI coding tools
    #[command(long_about = "Controls the MCP (Model Context Protocol) server that exposes\n\
        the Local History store to AI coding tools over stdio.")]
    Mcp(commands::mcp::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "relic=debug"
    } else {
        "relic=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Files(args) => commands::files::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Search(args) => commands::search::run(args),
        Commands::Restore(args) => commands::restore::run(args),
        Commands::Mcp(args) => commands::mcp::run(args),
    }
}
