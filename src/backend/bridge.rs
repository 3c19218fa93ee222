//! Thread boundary between the backend worker and the UI.
//!
//! Both directions use bounded crossbeam channels. The worker never blocks
//! on a full UI channel; it drops the snapshot instead, since a newer one is
//! always on its way. On the UI side [`BackendBridge::drain_latest`]
//! collapses a backlog of snapshots to the newest one.

use crate::config::SourceConfig;
use crate::error::{Result, TrafficVisError};
use crate::types::{ConnectionStatus, RegistryMap, TrafficSnapshot};
use crossbeam_channel::{bounded, Receiver, Sender};

use super::source::SourceStats;

/// Messages sent from the worker to the UI thread.
#[derive(Debug, Clone)]
pub enum BackendMessage {
    /// Fresh traffic counters
    Traffic(TrafficSnapshot),

    /// Fresh node registry
    Registry(RegistryMap),

    /// Source connection status changed
    ConnectionStatus(ConnectionStatus),

    /// The source failed; polling continues
    SourceError(String),

    /// The worker switched to a different source
    SourceChanged(String),

    /// Periodic fetch statistics
    Stats(SourceStats),

    /// Worker is shutting down
    Shutdown,
}

/// Commands sent from the UI thread to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Fetch traffic and registry now
    Refresh,
    /// Change the poll interval (milliseconds)
    SetPollInterval(u64),
    /// Stop periodic polling
    Pause,
    /// Resume periodic polling
    Resume,
    /// Replace the traffic source
    SwitchSource(SourceConfig),
    /// Stop the worker thread
    Shutdown,
}

/// Channel capacity for commands (UI → worker).
const CMD_CHANNEL_CAPACITY: usize = 64;
/// Channel capacity for messages (worker → UI).
pub const MSG_CHANNEL_CAPACITY: usize = 256;

/// Result of draining the message channel
#[derive(Debug, Default)]
pub struct DrainedMessages {
    /// Newest traffic snapshot, if any arrived
    pub traffic: Option<TrafficSnapshot>,
    /// Newest registry, if any arrived
    pub registry: Option<RegistryMap>,
    /// Older traffic snapshots replaced by a newer one in the same drain
    pub superseded: u64,
    /// Everything else, in arrival order
    pub events: Vec<BackendMessage>,
}

impl DrainedMessages {
    pub fn is_empty(&self) -> bool {
        self.traffic.is_none() && self.registry.is_none() && self.events.is_empty()
    }
}

/// Collapse a batch of messages, keeping only the newest data snapshots
pub fn coalesce(messages: impl IntoIterator<Item = BackendMessage>) -> DrainedMessages {
    let mut drained = DrainedMessages::default();
    for msg in messages {
        match msg {
            BackendMessage::Traffic(snapshot) => {
                if drained.traffic.replace(snapshot).is_some() {
                    drained.superseded += 1;
                }
            }
            BackendMessage::Registry(registry) => {
                drained.registry = Some(registry);
            }
            BackendMessage::SourceChanged(name) => {
                // Data queued before a switch belongs to the old source
                if drained.traffic.take().is_some() {
                    drained.superseded += 1;
                }
                drained.registry = None;
                drained.events.push(BackendMessage::SourceChanged(name));
            }
            other => drained.events.push(other),
        }
    }
    drained
}

/// UI-side handle for communicating with the worker thread.
pub struct BackendBridge {
    pub cmd_tx: Sender<BackendCommand>,
    pub msg_rx: Receiver<BackendMessage>,
}

impl BackendBridge {
    /// Create a new bridge pair: `(bridge_for_ui, cmd_rx, msg_tx)`.
    ///
    /// The worker thread owns `cmd_rx` and `msg_tx`.
    pub fn new() -> (Self, Receiver<BackendCommand>, Sender<BackendMessage>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (Self { cmd_tx, msg_rx }, cmd_rx, msg_tx)
    }

    /// Drain all pending messages in arrival order.
    pub fn drain(&self) -> Vec<BackendMessage> {
        self.msg_rx.try_iter().collect()
    }

    /// Drain all pending messages, keeping only the newest snapshots.
    pub fn drain_latest(&self) -> DrainedMessages {
        coalesce(self.msg_rx.try_iter())
    }

    /// Send a command, failing if the worker has gone away
    pub fn send_command(&self, cmd: BackendCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|e| TrafficVisError::Channel(format!("worker not running: {:?}", e.0)))
    }

    /// Ask the source for fresh data now. Fire-and-forget.
    pub fn request_refresh(&self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Refresh);
    }

    pub fn set_poll_interval(&self, interval_ms: u64) {
        let _ = self.cmd_tx.send(BackendCommand::SetPollInterval(interval_ms));
    }

    pub fn pause(&self) {
        let _ = self.cmd_tx.send(BackendCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.cmd_tx.send(BackendCommand::Resume);
    }

    pub fn switch_source(&self, config: SourceConfig) {
        if let Err(e) = self.send_command(BackendCommand::SwitchSource(config)) {
            tracing::warn!("Source switch not delivered: {}", e);
        }
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(BackendCommand::Shutdown);
    }
}
