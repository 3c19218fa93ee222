//! Sorter: orders entries by the selected column and direction.
//!
//! The sort is stable, so rows with equal keys keep their classification
//! order and the table does not shuffle between refreshes.

use std::cmp::Ordering;

use feruca::Collator;

use super::classifier::ClassifiedEntry;
use crate::config::settings::{SortField, SortOrder};

/// Column comparator holding the collator used for node names.
///
/// Names follow the Unicode collation algorithm (CLDR root order): accents
/// and case are secondary differences, so `"Éclair"` sorts between `"Alpha"`
/// and `"Zulu"`. Names the collator ranks equal fall back to a code-point
/// comparison so the result stays a total order.
pub struct EntryComparator {
    collator: Collator,
}

impl Default for EntryComparator {
    fn default() -> Self {
        Self {
            collator: Collator::default(),
        }
    }
}

impl EntryComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compare_names(&mut self, a: &str, b: &str) -> Ordering {
        self.collator.collate(a, b).then_with(|| a.cmp(b))
    }

    /// Ascending three-way comparison of two entries on a single column
    pub fn compare(
        &mut self,
        a: &ClassifiedEntry,
        b: &ClassifiedEntry,
        field: SortField,
    ) -> Ordering {
        match field {
            SortField::Name => self.compare_names(&a.node_name, &b.node_name),
            SortField::Connections => a.connection_count.cmp(&b.connection_count),
            SortField::Total => a.total.cmp(&b.total),
        }
    }
}

/// Compare two node names in collation order
pub fn compare_names(a: &str, b: &str) -> Ordering {
    EntryComparator::new().compare_names(a, b)
}

/// Ascending three-way comparison of two entries on a single column
pub fn compare_entries(a: &ClassifiedEntry, b: &ClassifiedEntry, field: SortField) -> Ordering {
    EntryComparator::new().compare(a, b, field)
}

/// Sort entries in place (stable)
pub fn sort_entries(entries: &mut [ClassifiedEntry], field: SortField, order: SortOrder) {
    let mut comparator = EntryComparator::new();
    entries.sort_by(|a, b| order.apply(comparator.compare(a, b, field)));
}

/// Return a sorted copy of the entries
pub fn sorted(
    mut entries: Vec<ClassifiedEntry>,
    field: SortField,
    order: SortOrder,
) -> Vec<ClassifiedEntry> {
    sort_entries(&mut entries, field, order);
    entries
}
