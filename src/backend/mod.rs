//! Backend module for polling traffic sources
//!
//! All source I/O happens on a separate thread to keep the UI responsive.
//! The worker talks to the frontend only through crossbeam channels.
//!
//! # Architecture
//!
//! - [`BackendCommand`] - Messages sent from UI to backend (refresh, pause, switch source)
//! - [`BackendMessage`] - Messages sent from backend to UI (traffic, registry, status, errors)
//! - [`BackendBridge`] - UI-side handle for sending commands and draining messages
//! - [`BackendWorker`] - Worker loop that owns the source and polls it
//!
//! # Sources
//!
//! - [`MockTrafficSource`] - Synthetic nodes with growing counters
//! - [`JsonFileSource`] - A JSON document rewritten by an external process
//!
//! # Example
//!
//! ```ignore
//! use trafficvis_rs::backend::{BackendBridge, BackendWorker};
//! use trafficvis_rs::config::SourceConfig;
//!
//! let (bridge, cmd_rx, msg_tx) = BackendBridge::new();
//! let running = Arc::new(AtomicBool::new(true));
//! let config = SourceConfig::default();
//!
//! std::thread::spawn(move || {
//!     BackendWorker::from_config(&config, cmd_rx, msg_tx, running).run();
//! });
//!
//! bridge.request_refresh();
//! let drained = bridge.drain_latest();
//! ```

pub mod bridge;
pub mod json_source;
pub mod mock_source;
pub mod source;
pub mod worker;

pub use bridge::{coalesce, BackendBridge, BackendCommand, BackendMessage, DrainedMessages};
pub use json_source::{JsonFileSource, TrafficDocument};
pub use mock_source::{default_nodes, MockNode, MockTrafficSource};
pub use source::{SourceStats, TrafficSource};
pub use worker::{BackendWorker, REGISTRY_REFRESH_POLLS};

use crate::config::{SourceConfig, SourceKind};

/// Instantiate the source described by a configuration
pub fn build_source(config: &SourceConfig) -> Box<dyn TrafficSource> {
    match &config.kind {
        SourceKind::Mock => Box::new(MockTrafficSource::new()),
        SourceKind::JsonFile { path } => Box::new(JsonFileSource::new(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_source_from_config() {
        let mock = build_source(&SourceConfig::default());
        assert_eq!(mock.name(), "Mock");

        let json = build_source(&SourceConfig::json_file("/tmp/traffic.json"));
        assert_eq!(json.name(), "traffic.json");
        assert!(!json.is_connected());
    }
}
