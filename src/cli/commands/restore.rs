//! Restore command - write a snapshot back to disk.
//!
//! Restores a file to one of its recorded snapshots. Unless
//! `--no-backup` is given, the file's current content is copied to a
//! timestamped backup next to it before being overwritten.

use anyhow::Result;
use colored::Colorize;

use crate::history::{restore_from_history, HistoryStore};

/// Arguments for the restore command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    relic restore /path/to/file.rs --entry 0      Restore the latest snapshot\n    \
    relic restore /path/to/file.rs --entry 2 --no-backup")]
pub struct Args {
    /// Absolute path of the file to restore (or its file:// URI)
    pub path: String,

    /// Index of the snapshot to restore (0 = most recent)
    #[arg(short, long, value_name = "N")]
    pub entry: usize,

    /// Overwrite without backing up the current content
    #[arg(long)]
    pub no_backup: bool,
}

/// Executes the restore command.
pub fn run(args: Args) -> Result<()> {
    let store = HistoryStore::locate()?;
    let outcome = restore_from_history(&store, &args.path, args.entry, !args.no_backup);

    if outcome.restored {
        println!("{}", outcome.message.green());
    } else {
        println!("{}", outcome.message.yellow());
    }

    Ok(())
}
