use crate::models::{ValidatedRecord, ALL_CATEGORIES};
use std::collections::HashSet;
use tracing::warn;

/// Selectable event categories: `"all"` first, then each distinct event type
/// in order of first appearance. Records without an event type add nothing.
pub fn event_vocabulary(records: &[ValidatedRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = vec![ALL_CATEGORIES.to_string()];
    seen.insert(ALL_CATEGORIES);

    for event_type in records.iter().filter_map(|r| r.event_type.as_deref()) {
        if !seen.insert(event_type) {
            if event_type == ALL_CATEGORIES {
                warn!("Dataset uses reserved category name {:?}; folded into the catch-all entry", ALL_CATEGORIES);
            }
            continue;
        }
        out.push(event_type.to_string());
    }

    out
}
