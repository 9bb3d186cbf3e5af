//! Full-text search over snapshot content.

use anyhow::{Context, Result};
use regex::RegexBuilder;

use super::models::{format_timestamp, SearchMatch};
use super::store::HistoryStore;

/// Searches every entry of every timeline for a literal term.
///
/// The term is matched as a literal substring (metacharacters are
/// escaped before the pattern is built), with case-sensitivity toggled
/// by flag. Results follow the scan's natural order: per file, then per
/// entry in recency order, with each record carrying the entry's
/// chronological rank and match count.
pub fn search_history_content(
    store: &HistoryStore,
    term: &str,
    case_sensitive: bool,
) -> Result<Vec<SearchMatch>> {
    let pattern = RegexBuilder::new(&regex::escape(term))
        .case_insensitive(!case_sensitive)
        .build()
        .with_context(|| format!("Failed to build search pattern for {term:?}"))?;

    let mut matches = Vec::new();
    for history in store.all_file_histories() {
        for (entry_index, entry) in history.entries.iter().enumerate() {
            let match_count = pattern.find_iter(&entry.content).count();
            if match_count > 0 {
                matches.push(SearchMatch {
                    file_path: history.original_file_path.clone(),
                    entry_index,
                    timestamp: format_timestamp(entry.timestamp),
                    match_count,
                });
            }
        }
    }

    Ok(matches)
}
