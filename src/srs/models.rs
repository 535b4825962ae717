//! Data models for spaced repetition scheduling

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Milliseconds in one scheduling day
pub const ONE_DAY_MS: i64 = 86_400_000;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of an item that has never been graded
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Spaced repetition state for one learning item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingRecord {
    /// Days until the next review; 0 only before the first grading
    #[serde(default)]
    pub interval: u32,
    /// SM-2 ease factor (default 2.5, never below 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Epoch milliseconds of the next review; 0 means never scheduled
    #[serde(default)]
    pub next_review_at: i64,
    /// Consecutive successful recalls
    #[serde(default)]
    pub repetition_count: u32,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Default for SchedulingRecord {
    fn default() -> Self {
        Self {
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review_at: 0,
            repetition_count: 0,
        }
    }
}

impl SchedulingRecord {
    /// Whether the item has never been scheduled
    pub fn is_new(&self) -> bool {
        self.next_review_at == 0
    }

    /// Check if the item is due for review at `now_ms`
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.is_new() || self.next_review_at <= now_ms
    }

    pub fn status(&self) -> ItemStatus {
        if self.is_new() {
            ItemStatus::New
        } else {
            match self.repetition_count {
                0 => ItemStatus::Lapsed,
                1 => ItemStatus::Learning,
                _ => ItemStatus::Mature,
            }
        }
    }
}

/// Where an item stands in the learning process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    /// Never graded
    New,
    /// Last grade was a failure
    Lapsed,
    /// One successful recall
    Learning,
    /// Two or more consecutive successful recalls
    Mature,
}

/// Three-level difficulty reported by the exercise UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Hard, Difficulty::Medium, Difficulty::Easy];

    /// Parse a label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "hard" => Some(Self::Hard),
            "medium" => Some(Self::Medium),
            "easy" => Some(Self::Easy),
            _ => None,
        }
    }

    /// SM-2 quality this difficulty stands for
    pub fn quality(self) -> i32 {
        match self {
            Self::Hard => 1,
            Self::Medium => 3,
            Self::Easy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Medium => "medium",
            Self::Easy => "easy",
        }
    }
}

/// Anything that can be scheduled: it only needs a stable identifier
pub trait Reviewable {
    fn item_id(&self) -> &str;
}

/// A learning item with an opaque display payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningItem {
    pub id: String,
    #[serde(default)]
    pub payload: Value,
}

impl LearningItem {
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

impl Reviewable for LearningItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// Statistics over a set of items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    pub new_items: usize,
    pub lapsed_items: usize,
    pub learning_items: usize,
    pub mature_items: usize,
    pub due_items: usize,
}

/// Interval each difficulty would produce, used to label grading buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPreview {
    pub hard: u32,
    pub medium: u32,
    pub easy: u32,
}
