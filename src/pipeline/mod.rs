//! Traffic derivation pipeline.
//!
//! Turns the three inputs (raw traffic, node registry, view state) into the
//! rows and totals the traffic table renders:
//!
//! ```text
//! TrafficMap ──┐
//!              ├─► classify ─► filter ─► sort ─► entries ─► aggregate ─► summary
//! RegistryMap ─┘                 ▲         ▲
//!                     ViewState ─┴─────────┘
//! ```
//!
//! [`derive`] is the pure form. [`TrafficPipeline`] owns one copy of each
//! input and memoizes the last output, so the UI can ask for it every frame
//! and only pay for a recompute when an input actually changed. Setting an
//! input replaces the previous value outright (last write wins).

pub mod aggregator;
pub mod classifier;
pub mod filter;
pub mod sorter;

pub use aggregator::{aggregate, SummaryStats};
pub use classifier::{classify, ClassifiedEntry, UNKNOWN_NODE_TYPE};
pub use filter::{filter_entries, is_tunnel_entry, URLTEST_NODE_TYPE};
pub use sorter::{compare_entries, compare_names, sort_entries, sorted, EntryComparator};

use crate::config::settings::{SortField, ViewState};
use crate::types::{RegistryMap, TrafficMap};

/// Derived rows and totals for one set of inputs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineOutput {
    /// Visible entries, filtered and sorted
    pub entries: Vec<ClassifiedEntry>,
    /// Totals over `entries`
    pub summary: SummaryStats,
}

/// Run the whole pipeline over a consistent set of inputs
pub fn derive(traffic: &TrafficMap, registry: &RegistryMap, view: &ViewState) -> PipelineOutput {
    let classified = classify(traffic, registry);
    let visible = filter_entries(classified, view.hide_non_tunnel_entries);
    let entries = sorted(visible, view.sort_field, view.sort_order);
    let summary = aggregate(&entries);
    PipelineOutput { entries, summary }
}

/// Memoizing owner of the pipeline inputs
#[derive(Debug, Default)]
pub struct TrafficPipeline {
    traffic: TrafficMap,
    registry: RegistryMap,
    view: ViewState,
    output: PipelineOutput,
    dirty: bool,
    recompute_count: u64,
}

impl TrafficPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a specific view state
    pub fn with_view_state(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Replace the traffic input
    pub fn set_traffic(&mut self, traffic: TrafficMap) {
        if !same_in_order(&self.traffic, &traffic) {
            self.traffic = traffic;
            self.dirty = true;
        }
    }

    /// Replace the registry input
    pub fn set_registry(&mut self, registry: RegistryMap) {
        if !same_in_order(&self.registry, &registry) {
            self.registry = registry;
            self.dirty = true;
        }
    }

    /// Replace the whole view state
    pub fn set_view_state(&mut self, view: ViewState) {
        if self.view != view {
            self.view = view;
            self.dirty = true;
        }
    }

    /// Select a sort column (see [`ViewState::set_sort_field`])
    pub fn set_sort_field(&mut self, field: SortField) {
        self.view.set_sort_field(field);
        self.dirty = true;
    }

    /// Flip the tunnel-only filter
    pub fn toggle_hide_non_tunnel_entries(&mut self) {
        self.view.toggle_hide_non_tunnel_entries();
        self.dirty = true;
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn traffic(&self) -> &TrafficMap {
        &self.traffic
    }

    pub fn registry(&self) -> &RegistryMap {
        &self.registry
    }

    /// True if an input changed since the last recompute
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of times the pipeline actually ran
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Recompute if any input changed. Returns true if it ran.
    pub fn refresh(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.output = derive(&self.traffic, &self.registry, &self.view);
        self.dirty = false;
        self.recompute_count += 1;
        tracing::trace!(
            "Pipeline recomputed: {} of {} entries visible",
            self.output.summary.count,
            self.traffic.len()
        );
        true
    }

    /// Current output, recomputed first if stale
    pub fn output(&mut self) -> &PipelineOutput {
        self.refresh();
        &self.output
    }

    /// Visible entries, recomputed first if stale
    pub fn entries(&mut self) -> &[ClassifiedEntry] {
        &self.output().entries
    }

    /// Summary totals, recomputed first if stale
    pub fn summary(&mut self) -> SummaryStats {
        self.output().summary
    }
}

/// Map equality that also requires the same enumeration order.
///
/// `IndexMap`'s own `PartialEq` ignores order, but order decides how ties
/// are broken in the sorter.
fn same_in_order<V: PartialEq>(
    a: &indexmap::IndexMap<String, V>,
    b: &indexmap::IndexMap<String, V>,
) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::SortOrder;
    use crate::types::{traffic_map_from, NodeMetadata, RawTrafficRecord};

    fn scenario() -> (TrafficMap, RegistryMap) {
        let traffic = traffic_map_from([
            RawTrafficRecord::new("A", 100.0, 50.0, 2),
            RawTrafficRecord::new("B", 0.0, 0.0, 1),
        ]);
        let registry: RegistryMap = [("A".to_string(), NodeMetadata::new("Direct"))]
            .into_iter()
            .collect();
        (traffic, registry)
    }

    #[test]
    fn test_derive_scenario() {
        let (traffic, registry) = scenario();
        let out = derive(&traffic, &registry, &ViewState::default());

        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.entries[0].node_name, "A");
        assert_eq!(out.entries[0].total, 150);
        assert_eq!(out.entries[0].node_type, "Direct");
        assert_eq!(out.entries[1].node_name, "B");
        assert_eq!(out.entries[1].node_type, UNKNOWN_NODE_TYPE);
        assert_eq!(
            out.summary,
            SummaryStats {
                count: 2,
                connections: 3,
                upload: 100,
                download: 50,
                total: 150
            }
        );
    }

    #[test]
    fn test_memoized_until_input_changes() {
        let (traffic, registry) = scenario();
        let mut pipeline = TrafficPipeline::new();
        pipeline.set_traffic(traffic.clone());
        pipeline.set_registry(registry.clone());

        let first = pipeline.output().clone();
        assert_eq!(pipeline.recompute_count(), 1);

        // Same inputs again: nothing to do
        pipeline.set_traffic(traffic);
        pipeline.set_registry(registry);
        assert!(!pipeline.is_dirty());
        assert_eq!(pipeline.output(), &first);
        assert_eq!(pipeline.recompute_count(), 1);

        pipeline.toggle_hide_non_tunnel_entries();
        assert!(pipeline.is_dirty());
        assert_eq!(pipeline.summary().count, 1);
        assert_eq!(pipeline.recompute_count(), 2);
    }

    #[test]
    fn test_malformed_input_is_still_memoized() {
        let traffic = traffic_map_from([
            RawTrafficRecord::new("x", f64::NAN, 1.0, 1),
            RawTrafficRecord::new("y", -5.0, f64::INFINITY, -2),
        ]);
        let mut pipeline = TrafficPipeline::new();
        pipeline.set_traffic(traffic.clone());
        assert!(pipeline.refresh());
        assert_eq!(pipeline.recompute_count(), 1);

        pipeline.set_traffic(traffic);
        assert!(!pipeline.is_dirty());
        assert!(!pipeline.refresh());
        assert_eq!(pipeline.recompute_count(), 1);
        assert_eq!(pipeline.summary().total, 1);
    }

    #[test]
    fn test_reordered_traffic_marks_dirty() {
        let mut pipeline = TrafficPipeline::new();
        pipeline.set_traffic(traffic_map_from([
            RawTrafficRecord::new("x", 1.0, 0.0, 0),
            RawTrafficRecord::new("y", 1.0, 0.0, 0),
        ]));
        pipeline.refresh();

        pipeline.set_traffic(traffic_map_from([
            RawTrafficRecord::new("y", 1.0, 0.0, 0),
            RawTrafficRecord::new("x", 1.0, 0.0, 0),
        ]));
        assert!(pipeline.is_dirty());
        let names: Vec<_> = pipeline.entries().iter().map(|e| e.node_name.clone()).collect();
        assert_eq!(names, vec!["y", "x"]);
    }

    #[test]
    fn test_view_state_is_injectable() {
        let (traffic, registry) = scenario();
        let view = ViewState {
            sort_field: SortField::Name,
            sort_order: SortOrder::Desc,
            hide_non_tunnel_entries: false,
        };
        let mut pipeline = TrafficPipeline::with_view_state(view);
        pipeline.set_traffic(traffic);
        pipeline.set_registry(registry);

        assert_eq!(pipeline.entries()[0].node_name, "B");
        assert_eq!(pipeline.view_state(), view);
    }

    #[test]
    fn test_empty_inputs() {
        let mut pipeline = TrafficPipeline::new();
        pipeline.set_view_state(ViewState {
            hide_non_tunnel_entries: true,
            ..ViewState::default()
        });
        assert!(pipeline.entries().is_empty());
        assert!(pipeline.summary().is_empty());
    }
}
