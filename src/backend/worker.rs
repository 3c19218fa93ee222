//! Backend Worker Thread Implementation
//!
//! The worker owns the active [`TrafficSource`] and polls it on its own
//! thread. It communicates with the UI thread only through the channels of a
//! [`BackendBridge`](super::BackendBridge).
//!
//! # Responsibilities
//!
//! - **Command processing**: refresh, pause/resume, poll interval, source switch
//! - **Polling**: fetches traffic every poll interval and the registry every
//!   [`REGISTRY_REFRESH_POLLS`] polls
//! - **Reconnection**: reconnects a closed source before the next fetch
//! - **Statistics tracking**: fetch timings and dropped snapshots
//!
//! # Timing
//!
//! Between polls the worker blocks in `recv_timeout` on the command channel,
//! so a command is handled as soon as it arrives and the loop never spins.

use crate::config::{clamp_poll_interval, SourceConfig};
use crate::types::{ConnectionStatus, TrafficSnapshot};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::bridge::{BackendCommand, BackendMessage};
use super::build_source;
use super::source::{SourceStats, TrafficSource};

/// Refetch the registry after this many traffic polls
pub const REGISTRY_REFRESH_POLLS: u32 = 30;

/// How often fetch statistics are published
const STATS_INTERVAL: Duration = Duration::from_secs(2);

/// The backend worker that runs the polling loop
pub struct BackendWorker {
    /// Active traffic source
    source: Box<dyn TrafficSource>,
    /// Command receiver from the UI
    command_rx: Receiver<BackendCommand>,
    /// Message sender to the UI
    message_tx: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Current connection status
    connection_status: ConnectionStatus,
    /// Whether periodic polling is suspended
    paused: bool,
    poll_interval: Duration,
    /// Polls since the registry was last fetched
    polls_since_registry: u32,
    registry_pending: bool,
    stats: SourceStats,
    last_poll_time: Option<Instant>,
    last_stats_time: Instant,
}

impl BackendWorker {
    /// Create a new backend worker around an existing source
    pub fn new(
        source: Box<dyn TrafficSource>,
        poll_interval_ms: u64,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            command_rx,
            message_tx,
            running,
            connection_status: ConnectionStatus::Disconnected,
            paused: false,
            poll_interval: Duration::from_millis(clamp_poll_interval(poll_interval_ms)),
            polls_since_registry: 0,
            registry_pending: true,
            stats: SourceStats::default(),
            last_poll_time: None,
            last_stats_time: Instant::now(),
        }
    }

    /// Create a worker for a source configuration
    pub fn from_config(
        config: &SourceConfig,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self::new(
            build_source(config),
            config.poll_interval_ms,
            command_rx,
            message_tx,
            running,
        )
    }

    /// Run the main worker loop
    pub fn run(&mut self) {
        tracing::info!(
            "Backend worker started (source: {}, interval: {:?})",
            self.source.name(),
            self.poll_interval
        );

        while self.running.load(Ordering::SeqCst) {
            match self.command_rx.recv_timeout(self.time_until_next_poll()) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("Command channel closed");
                    self.running.store(false, Ordering::SeqCst);
                    break;
                }
            }

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            if self.poll_due() {
                self.poll_once();
            }

            if self.last_stats_time.elapsed() >= STATS_INTERVAL {
                self.send_stats();
                self.last_stats_time = Instant::now();
            }
        }

        // Cleanup
        self.source.disconnect();
        self.update_connection_status(ConnectionStatus::Disconnected);
        let _ = self
            .message_tx
            .send_timeout(BackendMessage::Shutdown, Duration::from_millis(100));
        tracing::info!("Backend worker stopped");
    }

    fn poll_due(&self) -> bool {
        !self.paused
            && self
                .last_poll_time
                .map_or(true, |t| t.elapsed() >= self.poll_interval)
    }

    fn time_until_next_poll(&self) -> Duration {
        if self.paused {
            return self.poll_interval;
        }
        match self.last_poll_time {
            Some(t) => self.poll_interval.saturating_sub(t.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Handle a single command
    fn handle_command(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::Refresh => {
                self.registry_pending = true;
                self.poll_once();
            }
            BackendCommand::SetPollInterval(ms) => {
                self.poll_interval = Duration::from_millis(clamp_poll_interval(ms));
                tracing::debug!("Poll interval set to {:?}", self.poll_interval);
            }
            BackendCommand::Pause => {
                self.paused = true;
                tracing::info!("Polling paused");
            }
            BackendCommand::Resume => {
                self.paused = false;
                tracing::info!("Polling resumed");
            }
            BackendCommand::SwitchSource(config) => {
                self.switch_source(build_source(&config));
                self.poll_interval =
                    Duration::from_millis(clamp_poll_interval(config.poll_interval_ms));
            }
            BackendCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Replace the active source. The next loop iteration polls it.
    pub fn switch_source(&mut self, source: Box<dyn TrafficSource>) {
        self.source.disconnect();
        self.update_connection_status(ConnectionStatus::Disconnected);
        self.source = source;
        self.stats = SourceStats::default();
        self.registry_pending = true;
        self.last_poll_time = None;

        tracing::info!("Switched traffic source to {}", self.source.name());
        self.try_send_message(BackendMessage::SourceChanged(self.source.name().to_string()));
    }

    /// Open the source if needed. Returns false if it could not be opened.
    fn ensure_connected(&mut self) -> bool {
        if self.source.is_connected() {
            return true;
        }

        self.update_connection_status(ConnectionStatus::Connecting);
        match self.source.connect() {
            Ok(()) => {
                self.registry_pending = true;
                self.update_connection_status(ConnectionStatus::Connected);
                true
            }
            Err(e) => {
                self.report_error(format!("Failed to connect to {}: {}", self.source.name(), e));
                false
            }
        }
    }

    /// Fetch once and publish the results. Returns true on success.
    pub fn poll_once(&mut self) -> bool {
        self.last_poll_time = Some(Instant::now());

        if !self.ensure_connected() {
            return false;
        }

        if self.registry_pending || self.polls_since_registry >= REGISTRY_REFRESH_POLLS {
            match self.source.fetch_registry() {
                Ok(registry) => {
                    tracing::debug!("Fetched registry with {} nodes", registry.len());
                    self.registry_pending = false;
                    self.polls_since_registry = 0;
                    self.try_send_message(BackendMessage::Registry(registry));
                }
                Err(e) => {
                    // Retry next poll; traffic still goes out and classifies as Unknown
                    self.registry_pending = true;
                    let message = format!("Failed to fetch registry: {}", e);
                    tracing::warn!("{}", message);
                    self.stats.record_failure();
                    self.try_send_message(BackendMessage::SourceError(message));
                }
            }
        }

        let start = Instant::now();
        match self.source.fetch_traffic() {
            Ok(traffic) => {
                self.stats
                    .record_success(start.elapsed().as_micros().min(u64::MAX as u128) as u64);
                self.polls_since_registry += 1;
                tracing::trace!("Fetched traffic for {} nodes", traffic.len());

                if self.connection_status != ConnectionStatus::Connected {
                    self.update_connection_status(ConnectionStatus::Connected);
                }
                self.try_send_message(BackendMessage::Traffic(TrafficSnapshot::new(traffic)));
                true
            }
            Err(e) => {
                self.report_error(format!("Failed to fetch traffic: {}", e));
                false
            }
        }
    }

    fn report_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.stats.record_failure();
        self.update_connection_status(ConnectionStatus::Error);
        self.try_send_message(BackendMessage::SourceError(message));
    }

    fn update_connection_status(&mut self, status: ConnectionStatus) {
        if self.connection_status == status {
            return;
        }
        self.connection_status = status;
        self.try_send_message(BackendMessage::ConnectionStatus(status));
    }

    /// Send statistics to UI
    fn send_stats(&mut self) {
        let stats = self.stats.clone();
        self.try_send_message(BackendMessage::Stats(stats));
    }

    /// Try to send a message, counting it as dropped if the queue is full
    fn try_send_message(&mut self, msg: BackendMessage) {
        match self.message_tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.stats.record_drop(),
            Err(TrySendError::Disconnected(_)) => {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn stats(&self) -> &SourceStats {
        &self.stats
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}
