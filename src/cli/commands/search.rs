//! Search command - search snapshot content.
//!
//! Scans every snapshot of every tracked file for a literal term and
//! reports the matching entries with their match counts.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::history::{search_history_content, HistoryStore};
use crate::uri::uri_to_path;

/// Arguments for the search command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    relic search \"fn main\"             Search all snapshots\n    \
    relic search TODO --case-sensitive   Match case exactly\n    \
    relic search auth --format json      Output as JSON")]
pub struct Args {
    /// Text to search for (literal, not a regex)
    pub term: String,

    /// Match case-sensitively
    #[arg(short, long)]
    pub case_sensitive: bool,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the search command.
pub fn run(args: Args) -> Result<()> {
    let store = HistoryStore::locate()?;
    let matches = search_history_content(&store, &args.term, args.case_sensitive)?;

    if matches.is_empty() {
        println!("{}", format!("No matches for {:?}.", args.term).dimmed());
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&matches)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!(
                "{}",
                format!("{} matching snapshots", matches.len()).bold()
            );
            println!();

            for m in &matches {
                println!(
                    "  {}  entry {}  {}  {}",
                    format!("{:>3}x", m.match_count).cyan(),
                    m.entry_index,
                    m.timestamp.dimmed(),
                    uri_to_path(&m.file_path)
                );
            }
        }
    }

    Ok(())
}
