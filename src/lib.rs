//! # TrafficVis-RS: Per-node proxy traffic viewer
//!
//! A desktop table of how much traffic each proxy node has carried. Raw
//! per-node counters and a node registry are polled from a traffic source on
//! a background thread; the UI derives the visible rows and totals with a
//! small memoized pipeline.
//!
//! ## Architecture
//!
//! - **Backend**: Owns the traffic source and polls it in a separate thread
//! - **Pipeline**: Classifier → Filter → Sorter → Aggregator, pure and memoized
//! - **Frontend**: Renders the table using eframe/egui
//! - **Communication**: Crossbeam channels with last-write-wins draining
//!
//! ## Configuration
//!
//! Preferences and the source configuration are stored in the
//! platform-appropriate data directory under `dev.hxyulin.trafficvis-rs`:
//!
//! - **Linux**: `~/.local/share/dev.hxyulin.trafficvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.trafficvis-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.trafficvis-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use trafficvis_rs::{
//!     backend::{BackendBridge, BackendWorker},
//!     config::{AppConfig, AppState},
//!     frontend::TrafficVisApp,
//! };
//!
//! fn main() -> eframe::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let app_state = AppState::load_or_default();
//!
//!     let (bridge, cmd_rx, msg_tx) = BackendBridge::new();
//!     let running = Arc::new(AtomicBool::new(true));
//!     let source = config.source.clone();
//!     std::thread::spawn(move || {
//!         BackendWorker::from_config(&source, cmd_rx, msg_tx, running).run()
//!     });
//!
//!     eframe::run_native(
//!         "TrafficVis-RS",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(TrafficVisApp::new(cc, bridge, config, app_state)))),
//!     )
//! }
//! ```

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod i18n;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use app::TrafficVisApp;
pub use backend::{BackendBridge, BackendWorker, TrafficSource};
pub use config::{AppConfig, AppState, SortField, SortOrder, ViewState};
pub use error::{Result, TrafficVisError};
pub use pipeline::{ClassifiedEntry, SummaryStats, TrafficPipeline};
pub use types::{NodeMetadata, RawTrafficRecord, RegistryMap, TrafficMap};
