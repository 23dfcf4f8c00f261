//! Search filtering over tool display names
//!
//! Matching is a case-folded substring test against the display name with
//! underscores read as spaces, so "disk clean" finds `disk_cleanup.bat`.

use super::types::ToolRecord;

/// Normalized form of a display name used for matching
pub fn search_key(display_name: &str) -> String {
    display_name.replace('_', " ").to_lowercase()
}

/// Whether `tool` matches an already-lowercased search string
pub fn matches_search(tool: &ToolRecord, search_lower: &str) -> bool {
    search_key(&tool.display_name).contains(search_lower)
}

/// Subset of `all` matching `search`, in the original order.
///
/// An empty search returns the whole list. Records are cloned, which only
/// bumps the icon's reference count.
pub fn filter_tools(all: &[ToolRecord], search: &str) -> Vec<ToolRecord> {
    if search.is_empty() {
        return all.to_vec();
    }

    let search_lower = search.to_lowercase();
    all.iter()
        .filter(|tool| matches_search(tool, &search_lower))
        .cloned()
        .collect()
}
