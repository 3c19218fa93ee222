//! Test data builders for traffic and registry maps

use trafficvis_rs::types::{NodeMetadata, RawTrafficRecord, RegistryMap, TrafficMap};

/// Builder for traffic maps, preserving insertion order
#[derive(Default)]
pub struct TrafficBuilder {
    records: TrafficMap,
}

impl TrafficBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with upload/download bytes and a connection count
    pub fn node(mut self, name: &str, upload: f64, download: f64, connections: i64) -> Self {
        self.records.insert(
            name.to_string(),
            RawTrafficRecord::new(name, upload, download, connections),
        );
        self
    }

    /// Add a record as-is
    pub fn record(mut self, record: RawTrafficRecord) -> Self {
        self.records.insert(record.node_name.clone(), record);
        self
    }

    pub fn build(self) -> TrafficMap {
        self.records
    }
}

/// Builder for registry maps
#[derive(Default)]
pub struct RegistryBuilder {
    entries: RegistryMap,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, name: &str, node_type: &str) -> Self {
        self.entries
            .insert(name.to_string(), NodeMetadata::new(node_type));
        self
    }

    pub fn build(self) -> RegistryMap {
        self.entries
    }
}

/// The two-node example: A is a known Direct node, B has no registry entry
pub fn scenario() -> (TrafficMap, RegistryMap) {
    (
        TrafficBuilder::new()
            .node("A", 100.0, 50.0, 2)
            .node("B", 0.0, 0.0, 1)
            .build(),
        RegistryBuilder::new().node("A", "Direct").build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_builder_keeps_order() {
        let traffic = TrafficBuilder::new()
            .node("z", 1.0, 1.0, 0)
            .node("a", 1.0, 1.0, 0)
            .build();

        let names: Vec<_> = traffic.keys().cloned().collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(traffic["z"].node_name, "z");
    }
}
