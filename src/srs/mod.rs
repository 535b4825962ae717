//! Spaced repetition for vocabulary drills
//!
//! This module provides:
//! - SM-2 scheduling algorithm (pure, no I/O)
//! - Record persistence through a key-value store
//! - Review ordering (new items first, then earliest due)
//! - The session surface the exercise layer calls

pub mod algorithm;
pub mod clock;
pub mod models;
pub mod repository;
pub mod session;
pub mod sorter;

pub use algorithm::{calculate_next_review, difficulty_label_to_quality, format_interval, preview_intervals};
pub use clock::{Clock, ManualClock, SystemClock};
pub use models::*;
pub use repository::{RecordMap, SrsRepository, DEFAULT_RECORDS_KEY};
pub use session::ReviewSession;
