//! Spaced-repetition scheduling for vocabulary drills
//!
//! - [`srs`]: SM-2 scheduling, record persistence, review ordering and the
//!   session surface used by the exercises
//! - [`kv`]: key-value storage the records and content live in
//! - [`content`]: validated vocabulary content and its per-topic cache
//! - [`config`]: application configuration

pub mod config;
pub mod content;
pub mod kv;
pub mod srs;
