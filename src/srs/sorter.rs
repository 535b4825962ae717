//! Review ordering
//!
//! New items come first in their original order, then scheduled items
//! from the earliest due date to the latest.

use super::models::Reviewable;
use super::repository::RecordMap;

/// Sort key: unscheduled items before scheduled ones, then by due time
fn priority_key<T: Reviewable>(item: &T, records: &RecordMap) -> (bool, i64) {
    match records.get(item.item_id()) {
        Some(record) if !record.is_new() => (true, record.next_review_at),
        _ => (false, 0),
    }
}

/// Order items for a learning session without touching the input
pub fn order_items<T>(items: &[T], records: &RecordMap) -> Vec<T>
where
    T: Reviewable + Clone,
{
    let mut ordered = items.to_vec();
    // Stable: ties keep their input order
    ordered.sort_by_key(|item| priority_key(item, records));
    ordered
}

/// Ordered items that are due at `now_ms` (new items always are)
pub fn due_items<T>(items: &[T], records: &RecordMap, now_ms: i64) -> Vec<T>
where
    T: Reviewable + Clone,
{
    let mut due = order_items(items, records);
    due.retain(|item| {
        records
            .get(item.item_id())
            .map_or(true, |record| record.is_due(now_ms))
    });
    due
}
