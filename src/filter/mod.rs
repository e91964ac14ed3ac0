//! Date-range + category predicate over a validated series.

use crate::models::{FilterSelection, ValidatedRecord};

/// True when `record` falls inside the inclusive range and matches the category.
pub fn matches(record: &ValidatedRecord, selection: &FilterSelection) -> bool {
    selection.date_range.contains(&record.date)
        && selection.category.matches(record.event_type.as_deref())
}

/// Order-preserving subsequence of `records` passing `selection`.
pub fn apply_filter(records: &[ValidatedRecord], selection: &FilterSelection) -> Vec<ValidatedRecord> {
    if selection.is_unrestricted() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect()
}
