//! Show command - display one file's timeline.
//!
//! Lists the snapshots recorded for a file, newest first, or prints
//! the full content of one snapshot when `--entry` is given.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::history::models::format_timestamp;
use crate::history::HistoryStore;

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    relic show /path/to/file.rs              List the file's snapshots\n    \
    relic show /path/to/file.rs --entry 0    Print the latest snapshot\n    \
    relic show /path/to/file.rs --format json")]
pub struct Args {
    /// Absolute path of the file (or its file:// URI)
    pub path: String,

    /// Print the content of this entry (0 = most recent)
    #[arg(short, long, value_name = "N")]
    pub entry: Option<usize>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the show command.
pub fn run(args: Args) -> Result<()> {
    let store = HistoryStore::locate()?;

    let Some(history) = store.find_history_by_file_path(&args.path) else {
        println!("{}", format!("No history found for {}", args.path).yellow());
        return Ok(());
    };

    if let Some(index) = args.entry {
        let Some(entry) = history.entries.get(index) else {
            println!(
                "{}",
                format!(
                    "Entry index {index} is out of range; valid range is 0..{}",
                    history.entries.len()
                )
                .yellow()
            );
            return Ok(());
        };

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
            OutputFormat::Text => {
                println!(
                    "{}",
                    format!("Snapshot {index} of {}", args.path).bold()
                );
                println!("{}", format_timestamp(entry.timestamp).dimmed());
                println!();
                print!("{}", entry.content);
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
        OutputFormat::Text => {
            println!("{}", args.path.bold());
            println!(
                "{}",
                format!("{} snapshots", history.entries.len()).dimmed()
            );
            println!();

            for (index, entry) in history.entries.iter().enumerate() {
                println!(
                    "  {:>3}  {}  {:>8}  {}",
                    index.to_string().cyan(),
                    format_timestamp(entry.timestamp).dimmed(),
                    format!("{} B", entry.content.len()),
                    entry.relative_path
                );
            }
        }
    }

    Ok(())
}
