//! Core data types shared between the backend and the derivation pipeline
//!
//! Raw records arrive from a traffic source keyed by node name. Values are
//! kept as the source reports them (possibly negative or non-finite); the
//! classifier is responsible for sanitizing them.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Traffic counters for a single node as reported by the source
///
/// Equality compares the counters bit for bit, so a record carrying `NaN`
/// still equals an identical copy of itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrafficRecord {
    /// Node name. Filled from the map key when the source omits it.
    #[serde(default)]
    pub node_name: String,

    /// Bytes sent through this node
    #[serde(default)]
    pub upload: f64,

    /// Bytes received through this node
    #[serde(default)]
    pub download: f64,

    /// Source-supplied total, if any. The pipeline always derives its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    /// Number of live connections routed through this node
    #[serde(default, alias = "connections")]
    pub connection_count: i64,
}

impl PartialEq for RawTrafficRecord {
    fn eq(&self, other: &Self) -> bool {
        self.node_name == other.node_name
            && self.upload.to_bits() == other.upload.to_bits()
            && self.download.to_bits() == other.download.to_bits()
            && self.total.map(f64::to_bits) == other.total.map(f64::to_bits)
            && self.connection_count == other.connection_count
    }
}

impl Eq for RawTrafficRecord {}

impl RawTrafficRecord {
    /// Create a new record
    pub fn new(node_name: impl Into<String>, upload: f64, download: f64, connections: i64) -> Self {
        Self {
            node_name: node_name.into(),
            upload,
            download,
            total: None,
            connection_count: connections,
        }
    }

    /// Attach a source-supplied total
    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    /// True if any counter is negative or not a finite number
    pub fn is_malformed(&self) -> bool {
        let bad = |v: f64| !v.is_finite() || v < 0.0;
        bad(self.upload)
            || bad(self.download)
            || self.total.is_some_and(bad)
            || self.connection_count < 0
    }
}

/// Registry metadata for a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Node type as declared by the registry (e.g. "Shadowsocks", "URLTest")
    #[serde(rename = "type")]
    pub node_type: String,
}

impl NodeMetadata {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

/// Raw traffic keyed by node name, in source enumeration order
pub type TrafficMap = IndexMap<String, RawTrafficRecord>;

/// Node registry keyed by node name
pub type RegistryMap = IndexMap<String, NodeMetadata>;

/// Build a traffic map keyed by each record's node name
pub fn traffic_map_from(records: impl IntoIterator<Item = RawTrafficRecord>) -> TrafficMap {
    records
        .into_iter()
        .map(|r| (r.node_name.clone(), r))
        .collect()
}

/// One delivery of traffic data from the backend
#[derive(Debug, Clone)]
pub struct TrafficSnapshot {
    pub traffic: TrafficMap,
    pub captured_at: DateTime<Local>,
}

impl TrafficSnapshot {
    pub fn new(traffic: TrafficMap) -> Self {
        Self {
            traffic,
            captured_at: Local::now(),
        }
    }
}

/// Connection status of the traffic source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connecting => write!(f, "Connecting"),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error => write!(f, "Error"),
        }
    }
}
