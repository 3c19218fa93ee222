//! Aggregator: summary totals over the visible entries.

use super::classifier::ClassifiedEntry;

/// Totals shown under the traffic table.
///
/// Sums saturate at `u64::MAX`. `total` always equals `upload + download`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryStats {
    pub count: usize,
    pub connections: u64,
    pub upload: u64,
    pub download: u64,
    pub total: u64,
}

impl SummaryStats {
    /// True when no entries are visible
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Reduce entries to summary totals. Order does not matter.
pub fn aggregate(entries: &[ClassifiedEntry]) -> SummaryStats {
    let mut stats = entries
        .iter()
        .fold(SummaryStats::default(), |mut acc, entry| {
            acc.count += 1;
            acc.connections = acc.connections.saturating_add(entry.connection_count);
            acc.upload = acc.upload.saturating_add(entry.upload);
            acc.download = acc.download.saturating_add(entry.download);
            acc
        });
    stats.total = stats.upload.saturating_add(stats.download);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawTrafficRecord;
    use proptest::prelude::*;

    fn entry(up: u32, down: u32, conns: u32) -> ClassifiedEntry {
        ClassifiedEntry::from_record(
            "n",
            &RawTrafficRecord::new("n", up as f64, down as f64, conns as i64),
            "Direct",
        )
    }

    #[test]
    fn test_empty_is_all_zero() {
        let stats = aggregate(&[]);
        assert_eq!(stats, SummaryStats::default());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_sums() {
        let stats = aggregate(&[entry(100, 50, 2), entry(0, 0, 1)]);
        assert_eq!(
            stats,
            SummaryStats {
                count: 2,
                connections: 3,
                upload: 100,
                download: 50,
                total: 150,
            }
        );
    }

    proptest! {
        #[test]
        fn test_aggregation_is_additive(
            rows in prop::collection::vec((any::<u32>(), any::<u32>(), any::<u32>()), 0..50)
        ) {
            let entries: Vec<_> = rows.iter().map(|(u, d, c)| entry(*u, *d, *c)).collect();
            let stats = aggregate(&entries);

            prop_assert_eq!(stats.count, entries.len());
            prop_assert_eq!(stats.total, stats.upload + stats.download);
            prop_assert_eq!(stats.connections, rows.iter().map(|r| r.2 as u64).sum::<u64>());

            let mut reversed = entries.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate(&reversed), stats);
        }
    }
}
