//! Shared topic data published by the backend and read by the UI.
//!
//! `Topics` is a plain data bus with direct field access. The app writes to
//! it from `process_backend_messages()`; the toolbar and status bar read it.
//! Traffic and registry maps are not stored here; they go straight into the
//! [`TrafficPipeline`](crate::pipeline::TrafficPipeline).

use chrono::{DateTime, Local};

use crate::backend::SourceStats;
use crate::types::ConnectionStatus;

/// Status data published by the backend
#[derive(Debug, Default)]
pub struct Topics {
    /// Current source connection status
    pub connection_status: ConnectionStatus,

    /// Display name of the active source
    pub source_name: String,

    /// Capture time of the newest applied traffic snapshot
    pub last_update: Option<DateTime<Local>>,

    /// Most recent source error, cleared on reconnect
    pub last_error: Option<String>,

    /// Fetch statistics (updated every couple of seconds)
    pub stats: SourceStats,

    /// Traffic snapshots applied to the pipeline
    pub snapshots_applied: u64,

    /// Snapshots discarded because a newer one arrived in the same frame
    pub snapshots_superseded: u64,

    /// Number of nodes in the newest registry
    pub registry_size: usize,
}

impl Topics {
    /// True once at least one traffic snapshot has been applied
    pub fn has_data(&self) -> bool {
        self.last_update.is_some()
    }
}
