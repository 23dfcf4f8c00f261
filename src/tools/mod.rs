//! Tools module - discovery and filtering of launchable files
//!
//! This module provides functionality for:
//! - Scanning a directory (non-recursively) for files with a supported extension
//! - Building `ToolRecord`s with display names and synthesized icons
//! - Case-insensitive substring filtering over display names
//!
//! # Module Structure
//!
//! - `types` - Core data types (ToolRecord, ScanOptions, ScanOutcome, etc.)
//! - `scanner` - Directory enumeration and record construction
//! - `filter` - Search filtering

mod filter;
mod scanner;
mod types;

pub use filter::{filter_tools, matches_search, search_key};
pub use scanner::{display_name_for, extension_of, Scanner};
pub use types::{ExtensionMatch, ScanOptions, ScanOutcome, ToolRecord, SUPPORTED_EXTENSIONS};

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
