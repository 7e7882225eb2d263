/// Cross-collector merge with exact-duplicate removal.
///
/// `aggregate` takes the per-collector batches in collector order and
/// flattens them into one list, keeping the first occurrence of any record
/// that is structurally identical to an earlier one. Records that describe
/// the same physical event but differ in any field (a parade listed by two
/// sites carries two different `source` tags) are all kept.

use std::collections::HashSet;

use crate::model::EventRecord;

/// Stable dedup over the concatenation of `batches`.
pub fn aggregate<I>(batches: I) -> Vec<EventRecord>
where
    I: IntoIterator<Item = Vec<EventRecord>>,
{
    let mut seen: HashSet<EventRecord> = HashSet::new();
    let mut merged = Vec::new();

    for batch in batches {
        for record in batch {
            if seen.insert(record.clone()) {
                merged.push(record);
            }
        }
    }

    merged
}
