//! Classifier: joins raw traffic with registry metadata.
//!
//! The traffic map drives enumeration: every raw record yields exactly one
//! entry, in the map's order. Registry metadata is only looked up, never
//! iterated. Nodes missing from the registry get the `"Unknown"` sentinel
//! type, which usually means the traffic was matched by a rule rather than a
//! concrete proxy.

use crate::types::{RawTrafficRecord, RegistryMap, TrafficMap};

/// Type assigned to nodes that have no registry entry
pub const UNKNOWN_NODE_TYPE: &str = "Unknown";

/// A traffic record joined with its resolved node type.
///
/// Counters are sanitized: never negative, never non-finite.
/// `total` is always `upload + download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub node_name: String,
    pub upload: u64,
    pub download: u64,
    pub total: u64,
    pub connection_count: u64,
    pub node_type: String,
}

impl ClassifiedEntry {
    /// Build an entry from a raw record and an already resolved type.
    ///
    /// Malformed counters are clamped to zero.
    pub fn from_record(
        node_name: &str,
        record: &RawTrafficRecord,
        node_type: impl Into<String>,
    ) -> Self {
        let upload = sanitize_bytes(record.upload);
        let download = sanitize_bytes(record.download);
        let total = upload.saturating_add(download);

        if let Some(supplied) = record.total {
            if sanitize_bytes(supplied) != total {
                tracing::trace!(
                    "Node {} reported total {} but upload+download is {}",
                    node_name,
                    supplied,
                    total
                );
            }
        }

        Self {
            node_name: node_name.to_string(),
            upload,
            download,
            total,
            connection_count: sanitize_count(record.connection_count),
            node_type: node_type.into(),
        }
    }

    /// True if this node was not found in the registry
    pub fn is_unknown(&self) -> bool {
        self.node_type == UNKNOWN_NODE_TYPE
    }
}

/// Convert a reported byte count to `u64`.
///
/// Negative, NaN and infinite values become 0, fractions are truncated and
/// values beyond `u64::MAX` saturate.
pub fn sanitize_bytes(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.trunc() as u64
    }
}

/// Convert a reported connection count to `u64`, clamping negatives to 0
pub fn sanitize_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Resolve the node type for a name against the registry
pub fn resolve_node_type<'a>(registry: &'a RegistryMap, node_name: &str) -> &'a str {
    registry
        .get(node_name)
        .map(|meta| meta.node_type.as_str())
        .unwrap_or(UNKNOWN_NODE_TYPE)
}

/// Classify every raw record, in traffic-map order
pub fn classify(traffic: &TrafficMap, registry: &RegistryMap) -> Vec<ClassifiedEntry> {
    traffic
        .iter()
        .map(|(name, record)| {
            if record.is_malformed() {
                tracing::debug!("Clamping malformed counters for node {}: {:?}", name, record);
            }
            ClassifiedEntry::from_record(name, record, resolve_node_type(registry, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{traffic_map_from, NodeMetadata};
    use proptest::prelude::*;

    fn registry(pairs: &[(&str, &str)]) -> RegistryMap {
        pairs
            .iter()
            .map(|(name, ty)| (name.to_string(), NodeMetadata::new(*ty)))
            .collect()
    }

    #[test]
    fn test_known_and_unknown_types() {
        let traffic = traffic_map_from([
            RawTrafficRecord::new("A", 100.0, 50.0, 2),
            RawTrafficRecord::new("B", 0.0, 0.0, 1),
        ]);
        let entries = classify(&traffic, &registry(&[("A", "Direct")]));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].node_name, "A");
        assert_eq!(entries[0].node_type, "Direct");
        assert_eq!(entries[0].total, 150);
        assert_eq!(entries[1].node_name, "B");
        assert_eq!(entries[1].node_type, UNKNOWN_NODE_TYPE);
        assert!(entries[1].is_unknown());
    }

    #[test]
    fn test_registry_only_nodes_are_ignored() {
        let traffic = traffic_map_from([RawTrafficRecord::new("A", 1.0, 1.0, 0)]);
        let entries = classify(&traffic, &registry(&[("A", "Trojan"), ("Z", "VMess")]));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_type_case_is_preserved() {
        let traffic = traffic_map_from([RawTrafficRecord::new("Auto", 1.0, 1.0, 0)]);
        let entries = classify(&traffic, &registry(&[("Auto", "URLTest")]));
        assert_eq!(entries[0].node_type, "URLTest");
    }

    #[test]
    fn test_malformed_counters_clamped() {
        let traffic = traffic_map_from([
            RawTrafficRecord::new("neg", -10.0, 20.0, -3),
            RawTrafficRecord::new("nan", f64::NAN, f64::INFINITY, 1),
        ]);
        let entries = classify(&traffic, &RegistryMap::new());

        assert_eq!(entries[0].upload, 0);
        assert_eq!(entries[0].download, 20);
        assert_eq!(entries[0].total, 20);
        assert_eq!(entries[0].connection_count, 0);

        assert_eq!(entries[1].upload, 0);
        assert_eq!(entries[1].download, 0);
        assert_eq!(entries[1].total, 0);
    }

    #[test]
    fn test_supplied_total_is_recomputed() {
        let record = RawTrafficRecord::new("A", 10.0, 5.0, 0).with_total(999.0);
        let entry = ClassifiedEntry::from_record("A", &record, "Direct");
        assert_eq!(entry.total, 15);
    }

    #[test]
    fn test_sanitize_bytes_edges() {
        assert_eq!(sanitize_bytes(0.0), 0);
        assert_eq!(sanitize_bytes(-0.5), 0);
        assert_eq!(sanitize_bytes(1.9), 1);
        assert_eq!(sanitize_bytes(f64::NEG_INFINITY), 0);
        assert_eq!(sanitize_bytes(1e30), u64::MAX);
    }

    #[test]
    fn test_total_saturates() {
        let record = RawTrafficRecord::new("big", 1e30, 1e30, 0);
        let entry = ClassifiedEntry::from_record("big", &record, "Direct");
        assert_eq!(entry.total, u64::MAX);
    }

    #[test]
    fn test_empty_traffic() {
        assert!(classify(&TrafficMap::new(), &registry(&[("A", "Direct")])).is_empty());
    }

    proptest! {
        #[test]
        fn test_classification_is_total(
            names in prop::collection::hash_set("[a-z]{1,6}", 0..30),
            known_mask in prop::collection::vec(any::<bool>(), 30)
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let traffic = traffic_map_from(
                names.iter().map(|n| RawTrafficRecord::new(n.clone(), 1.0, 2.0, 1)),
            );
            let registry: RegistryMap = names
                .iter()
                .zip(known_mask.iter())
                .filter(|(_, known)| **known)
                .map(|(n, _)| (n.clone(), NodeMetadata::new("Shadowsocks")))
                .collect();

            let entries = classify(&traffic, &registry);

            prop_assert_eq!(entries.len(), traffic.len());
            for entry in &entries {
                prop_assert!(traffic.contains_key(&entry.node_name));
                match registry.get(&entry.node_name) {
                    Some(meta) => {
                        prop_assert_eq!(&entry.node_type, &meta.node_type);
                    }
                    None => {
                        prop_assert_eq!(entry.node_type.as_str(), UNKNOWN_NODE_TYPE);
                    }
                }
            }
        }

        #[test]
        fn test_sanitized_values_never_exceed_inputs(up in any::<f64>(), down in any::<f64>()) {
            let record = RawTrafficRecord::new("n", up, down, 0);
            let entry = ClassifiedEntry::from_record("n", &record, "Direct");
            prop_assert_eq!(entry.total, entry.upload.saturating_add(entry.download));
            if !up.is_finite() || up <= 0.0 {
                prop_assert_eq!(entry.upload, 0);
            }
        }
    }
}
