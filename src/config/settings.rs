//! Runtime settings that can be modified during application execution
//!
//! This module contains state that changes while the view is open and is
//! never written to disk:
//!
//! - [`ViewState`] - Sort key, sort direction and the tunnel-only filter
//! - [`RuntimeSettings`] - Polling state of the traffic source
//!
//! # Sorting policy
//!
//! Clicking the active sort column flips the direction. Clicking a different
//! column selects it and always starts descending, so the busiest nodes
//! appear first whichever column was chosen.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{DEFAULT_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};

/// Column the traffic table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Name,
    Connections,
    Total,
}

impl SortField {
    /// All sortable columns in display order
    pub fn all() -> &'static [SortField] {
        &[SortField::Name, SortField::Connections, SortField::Total]
    }

    /// Translation key for the column header
    pub fn label_key(&self) -> &'static str {
        match self {
            SortField::Name => "table.name",
            SortField::Connections => "table.connections",
            SortField::Total => "table.total",
        }
    }
}

/// Direction of the ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Apply this direction to an ascending three-way comparison
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Arrow shown next to the active column header
    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

/// User-controlled presentation state of the traffic table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// Hide rule-only ("Unknown") entries and URL-test groups
    pub hide_non_tunnel_entries: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort_field: SortField::Total,
            sort_order: SortOrder::Desc,
            hide_non_tunnel_entries: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a sort column.
    ///
    /// Re-selecting the current column flips the direction; a new column
    /// resets the direction to descending.
    pub fn set_sort_field(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Desc;
        }
    }

    /// Flip the tunnel-only filter
    pub fn toggle_hide_non_tunnel_entries(&mut self) {
        self.hide_non_tunnel_entries = !self.hide_non_tunnel_entries;
    }

    /// Direction arrow for a column header, if that column is active
    pub fn arrow_for(&self, field: SortField) -> Option<&'static str> {
        (self.sort_field == field).then(|| self.sort_order.arrow())
    }
}

/// Runtime polling settings for the traffic source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Whether polling is paused
    pub paused: bool,

    /// Current poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            paused: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl RuntimeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set the poll interval, clamped to the supported range.
    /// Returns the value actually applied.
    pub fn set_poll_interval(&mut self, interval_ms: u64) -> u64 {
        self.poll_interval_ms = clamp_poll_interval(interval_ms);
        self.poll_interval_ms
    }
}

/// Clamp a poll interval to the supported range
pub fn clamp_poll_interval(interval_ms: u64) -> u64 {
    interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS)
}
