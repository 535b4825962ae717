//! Review session surface used by the exercise layer
//!
//! The exercise layer walks the ordered queue and calls `grade_item` once
//! per grading decision. Grades are not deduplicated here.

use super::algorithm::{difficulty_label_to_quality, preview_intervals};
use super::clock::{Clock, SystemClock};
use super::models::{IntervalPreview, Reviewable, ReviewStats, SchedulingRecord};
use super::repository::SrsRepository;
use super::sorter;
use crate::kv::{KeyValueStore, Result};

pub struct ReviewSession<S, C = SystemClock> {
    repository: SrsRepository<S>,
    clock: C,
}

impl<S: KeyValueStore> ReviewSession<S, SystemClock> {
    pub fn new(repository: SrsRepository<S>) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ReviewSession<S, C> {
    pub fn with_clock(repository: SrsRepository<S>, clock: C) -> Self {
        Self { repository, clock }
    }

    pub fn repository(&self) -> &SrsRepository<S> {
        &self.repository
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current record for an item (the default record if never graded)
    pub fn get_due_record(&self, item_id: &str) -> SchedulingRecord {
        self.repository.get_record(item_id)
    }

    /// Grade an item with a difficulty label and persist the new record
    pub fn grade_item(&self, item_id: &str, difficulty_label: &str) -> Result<SchedulingRecord> {
        let quality = difficulty_label_to_quality(difficulty_label);
        self.repository
            .update_record(item_id, quality, self.clock.now_millis())
    }

    /// All items in learning order
    pub fn order_items<T: Reviewable + Clone>(&self, items: &[T]) -> Vec<T> {
        sorter::order_items(items, &self.repository.load_records())
    }

    /// Items due now, in learning order
    pub fn due_items<T: Reviewable + Clone>(&self, items: &[T]) -> Vec<T> {
        sorter::due_items(items, &self.repository.load_records(), self.clock.now_millis())
    }

    pub fn stats<T: Reviewable>(&self, items: &[T]) -> ReviewStats {
        self.repository
            .stats(items.iter().map(|item| item.item_id()), self.clock.now_millis())
    }

    /// Intervals each difficulty would give the item right now
    pub fn preview(&self, item_id: &str) -> IntervalPreview {
        preview_intervals(&self.repository.get_record(item_id))
    }
}
