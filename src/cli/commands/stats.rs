//! Stats command - show store overview.
//!
//! Displays where the Local History store was resolved to, whether it
//! exists, and how many files and snapshots it currently holds.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::history::HistoryStore;

/// Arguments for the stats command.
#[derive(clap::Args)]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the stats command.
pub fn run(args: Args) -> Result<()> {
    let store = HistoryStore::locate()?;
    let stats = store.history_stats();

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Relic".bold().cyan());
    println!("{}", "Local History snapshots".dimmed());
    println!();

    println!("{}", "Store:".bold());
    println!("  Location: {}", stats.history_dir_path.display());
    if stats.history_dir_exists {
        println!("  Tracked files:   {}", stats.total_files);
        println!("  Total snapshots: {}", stats.total_entries);
    } else {
        println!("  {}", "The store does not exist yet.".yellow());
        println!();
        println!(
            "{}",
            "Hint: the editor creates it after the first tracked save.".dimmed()
        );
    }

    Ok(())
}
