//! Filter: hides entries that are not real tunnels.
//!
//! With the toggle off every entry passes. With it on, entries classified as
//! `"Unknown"` (exact match) and URL-test groups (type `urltest`, any case)
//! are dropped. Relative order is preserved.

use super::classifier::{ClassifiedEntry, UNKNOWN_NODE_TYPE};

/// Node type of latency-test groups, compared case-insensitively
pub const URLTEST_NODE_TYPE: &str = "urltest";

/// True if the entry is shown when non-tunnel entries are hidden
pub fn is_tunnel_entry(entry: &ClassifiedEntry) -> bool {
    entry.node_type != UNKNOWN_NODE_TYPE && entry.node_type.to_lowercase() != URLTEST_NODE_TYPE
}

/// Apply the visibility filter
pub fn filter_entries(
    mut entries: Vec<ClassifiedEntry>,
    hide_non_tunnel_entries: bool,
) -> Vec<ClassifiedEntry> {
    if hide_non_tunnel_entries {
        entries.retain(is_tunnel_entry);
    }
    entries
}
