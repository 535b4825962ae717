//! Vocabulary content for drills
//!
//! This module provides:
//! - Validation of generated content into typed vocabulary items
//! - A per-topic cache in the key-value store
//! - The provider the review layer pulls items from

mod cache;
pub mod errors;
mod models;
mod parse;
mod provider;

pub use cache::ContentCache;
pub use errors::ContentError;
pub use models::{CachedTopic, VocabularyItem};
pub use parse::parse_generated_content;
pub use provider::{CachedContentProvider, ContentProvider};
