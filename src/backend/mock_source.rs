//! Mock Traffic Source for development and testing
//!
//! Simulates a proxy client with a handful of nodes whose counters grow on
//! every fetch. The node set is chosen to exercise every branch of the
//! pipeline:
//!
//! - Concrete proxies present in the registry (Shadowsocks, VMess, Trojan)
//! - A `URLTest` group, hidden by the tunnel-only filter
//! - `DIRECT` and `REJECT` built-ins
//! - Rule targets with no registry entry, classified as `Unknown`
//!
//! Growth is driven by a tick counter and a seeded xorshift generator, so a
//! given seed always produces the same sequence of snapshots.
//!
//! # Example
//!
//! ```ignore
//! use trafficvis_rs::backend::{MockTrafficSource, TrafficSource};
//!
//! let mut source = MockTrafficSource::new();
//! source.connect()?;
//! let traffic = source.fetch_traffic()?;
//! ```

use crate::error::{Result, TrafficVisError};
use crate::types::{NodeMetadata, RawTrafficRecord, RegistryMap, TrafficMap};

use super::source::TrafficSource;

/// One simulated node
#[derive(Debug, Clone)]
pub struct MockNode {
    /// Node name
    pub name: String,
    /// Registry type, or `None` to leave the node out of the registry
    pub node_type: Option<String>,
    /// Mean bytes uploaded per tick
    pub upload_rate: f64,
    /// Mean bytes downloaded per tick
    pub download_rate: f64,
    /// Upper bound on simulated live connections
    pub max_connections: i64,
    upload: f64,
    download: f64,
    connections: i64,
}

impl MockNode {
    pub fn new(name: impl Into<String>, node_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.map(str::to_string),
            upload_rate: 2_048.0,
            download_rate: 16_384.0,
            max_connections: 8,
            upload: 0.0,
            download: 0.0,
            connections: 0,
        }
    }

    /// Set the per-tick transfer rates
    pub fn with_rates(mut self, upload: f64, download: f64) -> Self {
        self.upload_rate = upload;
        self.download_rate = download;
        self
    }

    /// Set the connection ceiling
    pub fn with_max_connections(mut self, max: i64) -> Self {
        self.max_connections = max;
        self
    }

    fn advance(&mut self, rng: &mut XorShift) {
        // Jitter rates by ±50% so the ordering moves around
        self.upload += self.upload_rate * (0.5 + rng.next_f64());
        self.download += self.download_rate * (0.5 + rng.next_f64());
        if self.max_connections > 0 {
            self.connections = (rng.next_u64() % (self.max_connections as u64 + 1)) as i64;
        }
    }

    fn record(&self) -> RawTrafficRecord {
        RawTrafficRecord::new(
            self.name.clone(),
            self.upload.floor(),
            self.download.floor(),
            self.connections,
        )
    }
}

/// Small deterministic PRNG
#[derive(Debug, Clone)]
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // xorshift must never hold zero
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.0 = s;
        s
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Synthetic traffic source
#[derive(Debug, Clone)]
pub struct MockTrafficSource {
    name: String,
    nodes: Vec<MockNode>,
    rng: XorShift,
    connected: bool,
    ticks: u64,
    /// Fail every Nth traffic fetch (0 = never)
    fail_every: u64,
}

impl Default for MockTrafficSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrafficSource {
    /// Create a mock source with the default node set
    pub fn new() -> Self {
        Self::with_nodes(default_nodes())
    }

    /// Create a mock source with a custom node set
    pub fn with_nodes(nodes: Vec<MockNode>) -> Self {
        Self {
            name: "Mock".to_string(),
            nodes,
            rng: XorShift::new(0x5eed_cafe),
            connected: false,
            ticks: 0,
            fail_every: 0,
        }
    }

    /// Reseed the generator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = XorShift::new(seed);
        self
    }

    /// Make every Nth traffic fetch fail, to exercise error handling
    pub fn with_failure_every(mut self, n: u64) -> Self {
        self.fail_every = n;
        self
    }

    /// Number of traffic fetches served so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn nodes(&self) -> &[MockNode] {
        &self.nodes
    }
}

impl TrafficSource for MockTrafficSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<()> {
        tracing::info!("Mock traffic source connected ({} nodes)", self.nodes.len());
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn fetch_traffic(&mut self) -> Result<TrafficMap> {
        if !self.connected {
            return Err(TrafficVisError::Source("Mock source not connected".to_string()));
        }

        self.ticks += 1;
        if self.fail_every > 0 && self.ticks % self.fail_every == 0 {
            return Err(TrafficVisError::Source(format!(
                "Simulated failure on tick {}",
                self.ticks
            )));
        }

        let rng = &mut self.rng;
        Ok(self
            .nodes
            .iter_mut()
            .map(|node| {
                node.advance(rng);
                (node.name.clone(), node.record())
            })
            .collect())
    }

    fn fetch_registry(&mut self) -> Result<RegistryMap> {
        if !self.connected {
            return Err(TrafficVisError::Source("Mock source not connected".to_string()));
        }

        Ok(self
            .nodes
            .iter()
            .filter_map(|node| {
                node.node_type
                    .as_ref()
                    .map(|ty| (node.name.clone(), NodeMetadata::new(ty.clone())))
            })
            .collect())
    }
}

/// Default simulated node set
pub fn default_nodes() -> Vec<MockNode> {
    vec![
        MockNode::new("HK-01", Some("Shadowsocks")).with_rates(8_192.0, 65_536.0),
        MockNode::new("JP-02", Some("VMess")).with_rates(4_096.0, 32_768.0),
        MockNode::new("US-03", Some("Trojan")).with_rates(1_024.0, 8_192.0),
        MockNode::new("SG-04", Some("Hysteria2")).with_rates(512.0, 4_096.0),
        MockNode::new("Auto", Some("URLTest")).with_rates(256.0, 256.0),
        MockNode::new("DIRECT", Some("Direct")).with_rates(16_384.0, 131_072.0),
        MockNode::new("REJECT", Some("Reject"))
            .with_rates(0.0, 0.0)
            .with_max_connections(2),
        MockNode::new("GEOIP,CN", None).with_rates(2_048.0, 4_096.0),
        MockNode::new("MATCH", None).with_rates(128.0, 512.0),
    ]
}
