//! TrafficSource trait for a unified source interface
//!
//! Implementations deliver the two external inputs of the derivation
//! pipeline: per-node traffic counters and the node registry. Both the
//! synthetic mock source and the JSON file source implement this trait, so
//! the worker does not care where data comes from.

use crate::error::Result;
use crate::types::{RegistryMap, TrafficMap};
use std::collections::VecDeque;

/// Size of the rolling window for recent fetch times
const RECENT_WINDOW_SIZE: usize = 50;

/// Statistics for source fetches
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStats {
    /// Successful traffic fetches
    pub successful_fetches: u64,
    /// Failed fetches (traffic or registry)
    pub failed_fetches: u64,
    /// Duration of the last successful fetch in microseconds
    pub last_fetch_time_us: u64,
    /// Snapshots the UI channel had no room for
    pub dropped_snapshots: u64,
    /// Rolling window of recent fetch times
    pub recent_fetch_times: VecDeque<u64>,
}

impl Default for SourceStats {
    fn default() -> Self {
        Self {
            successful_fetches: 0,
            failed_fetches: 0,
            last_fetch_time_us: 0,
            dropped_snapshots: 0,
            recent_fetch_times: VecDeque::with_capacity(RECENT_WINDOW_SIZE),
        }
    }
}

impl SourceStats {
    /// Record a successful fetch
    pub fn record_success(&mut self, time_us: u64) {
        self.successful_fetches += 1;
        self.last_fetch_time_us = time_us;
        self.recent_fetch_times.push_back(time_us);
        if self.recent_fetch_times.len() > RECENT_WINDOW_SIZE {
            self.recent_fetch_times.pop_front();
        }
    }

    /// Record a failed fetch
    pub fn record_failure(&mut self) {
        self.failed_fetches += 1;
    }

    /// Record a snapshot that could not be delivered
    pub fn record_drop(&mut self) {
        self.dropped_snapshots += 1;
    }

    /// Average of the recent fetch times in microseconds
    pub fn avg_fetch_time_us(&self) -> f64 {
        if self.recent_fetch_times.is_empty() {
            0.0
        } else {
            self.recent_fetch_times.iter().sum::<u64>() as f64
                / self.recent_fetch_times.len() as f64
        }
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.successful_fetches + self.failed_fetches;
        if total == 0 {
            100.0
        } else {
            (self.successful_fetches as f64 / total as f64) * 100.0
        }
    }
}

/// Unified interface for traffic sources
///
/// Implementations must be `Send` so the worker can own them on its thread.
pub trait TrafficSource: Send {
    /// Human-readable name of the source
    fn name(&self) -> &str;

    /// Open the source. Called before the first fetch and after failures.
    fn connect(&mut self) -> Result<()>;

    /// Close the source
    fn disconnect(&mut self);

    /// Check if the source is open
    fn is_connected(&self) -> bool;

    /// Fetch the current per-node traffic counters
    fn fetch_traffic(&mut self) -> Result<TrafficMap>;

    /// Fetch the current node registry
    fn fetch_registry(&mut self) -> Result<RegistryMap>;
}
