//! SM-2 Spaced Repetition Algorithm
//!
//! Variant of the SuperMemo 2 algorithm computing the next review
//! interval and ease factor from a recall quality.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! Unlike classic SM-2 the ease factor is updated on failures too, so
//! repeated lapses push an item toward the 1.3 floor.

use super::models::{
    Difficulty, IntervalPreview, SchedulingRecord, MIN_EASE_FACTOR, ONE_DAY_MS,
};

/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: i32 = 3;

/// Quality used for labels the UI does not recognise
pub const DEFAULT_QUALITY: i32 = 3;

/// Calculate the next scheduling record using the SM-2 variant
///
/// # Arguments
/// * `record` - Current record (the default record for unseen items)
/// * `quality` - Quality rating, clamped to 0-5
/// * `now_ms` - Grading time in epoch milliseconds
pub fn calculate_next_review(record: &SchedulingRecord, quality: i32, now_ms: i64) -> SchedulingRecord {
    let clamped = quality.clamp(0, 5);
    if clamped != quality {
        log::debug!("Quality {} out of range, clamped to {}", quality, clamped);
    }
    let quality = clamped;

    let (interval, repetition_count) = if quality >= PASSING_QUALITY {
        let interval = match record.repetition_count {
            0 => 1,
            1 => 6,
            _ => grow_interval(record.interval, record.ease_factor),
        };
        (interval, record.repetition_count.saturating_add(1))
    } else {
        (1, 0)
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let miss = f64::from(5 - quality);
    let ease_factor = (record.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

    SchedulingRecord {
        interval,
        ease_factor,
        next_review_at: now_ms.saturating_add(i64::from(interval) * ONE_DAY_MS),
        repetition_count,
    }
}

/// `round(interval * ease)` with halves rounded away from zero, never below 1
fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    // Float-to-int casts saturate, so huge products stop at u32::MAX
    let grown = (f64::from(interval) * ease_factor).round() as u32;
    grown.max(1)
}

/// Map a difficulty label from the UI to an SM-2 quality
pub fn difficulty_label_to_quality(label: &str) -> i32 {
    Difficulty::from_label(label)
        .map(Difficulty::quality)
        .unwrap_or(DEFAULT_QUALITY)
}

/// Calculate the interval each difficulty would give
/// Used to show learners what each grading button does
pub fn preview_intervals(record: &SchedulingRecord) -> IntervalPreview {
    let interval_for = |d: Difficulty| calculate_next_review(record, d.quality(), 0).interval;

    IntervalPreview {
        hard: interval_for(Difficulty::Hard),
        medium: interval_for(Difficulty::Medium),
        easy: interval_for(Difficulty::Easy),
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
