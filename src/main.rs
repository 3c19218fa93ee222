//! Node Traffic Viewer - Main Entry Point
//!
//! Polls a proxy client's per-node traffic counters and shows them as a
//! sortable, filterable table.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trafficvis_rs::{
    backend::{BackendBridge, BackendWorker},
    config::{ensure_app_data_dir, AppConfig, AppState, LOG_DIR},
    frontend::TrafficVisApp,
    i18n,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory for rolling log files
fn log_dir() -> anyhow::Result<PathBuf> {
    let dir = ensure_app_data_dir()
        .context("No app data directory for logs")?
        .join(LOG_DIR);
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    Ok(dir)
}

/// Install the console layer and, when possible, a daily file layer.
///
/// The returned guard flushes the file writer on drop and must be kept alive.
fn init_logging() -> Option<WorkerGuard> {
    let (file_layer, guard, file_error) = match log_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "trafficvis.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,trafficvis_rs=debug")),
        )
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("File logging disabled: {:#}", e);
    }

    guard
}

fn main() -> eframe::Result<()> {
    let _log_guard = init_logging();

    tracing::info!("Starting Node Traffic Viewer");

    // Load preferences and source configuration
    let app_state = AppState::load_or_default();
    let config = AppConfig::load_or_default();
    i18n::set_language(app_state.ui_preferences.language);
    tracing::info!(
        "Traffic source: {} (every {} ms)",
        config.source.kind,
        config.source.poll_interval_ms
    );

    // Create the bridge and spawn the backend thread
    let (bridge, cmd_rx, msg_tx) = BackendBridge::new();
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let source_config = config.source.clone();
    let backend_handle = std::thread::Builder::new()
        .name("traffic-backend".to_string())
        .spawn(move || {
            BackendWorker::from_config(&source_config, cmd_rx, msg_tx, running_clone).run();
        })
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_min_inner_size([640.0, 360.0])
            .with_title(i18n::window_title()),
        ..Default::default()
    };

    // Run the eframe application
    let result = eframe::run_native(
        "Node Traffic",
        native_options,
        Box::new(|cc| Ok(Box::new(TrafficVisApp::new(cc, bridge, config, app_state)))),
    );

    // Signal backend to stop and wait for it
    tracing::info!("Shutting down...");
    running.store(false, Ordering::SeqCst);
    if backend_handle.join().is_err() {
        tracing::error!("Backend thread panicked");
    }

    result
}
