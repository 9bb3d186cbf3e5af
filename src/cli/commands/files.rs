//! Files command - list tracked files.
//!
//! Displays a table of every file the Local History store tracks,
//! with its snapshot count and the time of its most recent snapshot.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::history::models::format_timestamp;
use crate::history::HistoryStore;
use crate::uri::uri_to_path;

/// Arguments for the files command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    relic files                    List all tracked files\n    \
    relic files --format json      Output as JSON")]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the files command.
pub fn run(args: Args) -> Result<()> {
    let store = HistoryStore::locate()?;
    let histories = store.all_file_histories();

    if histories.is_empty() {
        println!("{}", "No tracked files found.".dimmed());
        println!();
        println!(
            "History store: {} {}",
            store.root().display(),
            if store.history_directory_exists() {
                "(empty)".dimmed()
            } else {
                "(does not exist)".dimmed()
            }
        );
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&histories)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            const ENTRIES_WIDTH: usize = 8;
            const RECENT_WIDTH: usize = 23;

            println!(
                "{}",
                format!(
                    "{:>ENTRIES_WIDTH$}  {:<RECENT_WIDTH$}  {}",
                    "ENTRIES", "MOST RECENT", "FILE"
                )
                .bold()
            );

            for history in &histories {
                let recent = history
                    .most_recent_timestamp()
                    .map(format_timestamp)
                    .unwrap_or_else(|| "-".to_string());

                println!(
                    "{:>ENTRIES_WIDTH$}  {:<RECENT_WIDTH$}  {}",
                    history.entries.len(),
                    recent.dimmed(),
                    uri_to_path(&history.original_file_path)
                );
            }
        }
    }

    Ok(())
}
