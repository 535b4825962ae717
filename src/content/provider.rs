//! Content providers supplying learning items per topic

use super::cache::ContentCache;
use super::errors::{ContentError, Result};
use super::models::VocabularyItem;
use super::parse::parse_generated_content;
use crate::config::ContentConfig;
use crate::kv::KeyValueStore;

/// Source of vocabulary items for a topic
pub trait ContentProvider {
    fn items(&self, topic: &str) -> Result<Vec<VocabularyItem>>;
}

/// Serves previously generated content from the local cache
pub struct CachedContentProvider<S> {
    cache: ContentCache<S>,
    config: ContentConfig,
}

impl<S: KeyValueStore> CachedContentProvider<S> {
    pub fn new(store: S, config: ContentConfig) -> Self {
        Self {
            cache: ContentCache::new(store, config.language.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Validate raw generated content and cache it for `topic`
    pub fn import(&self, topic: &str, raw: &str) -> Result<Vec<VocabularyItem>> {
        let items = parse_generated_content(topic, raw)?;
        if items.is_empty() {
            return Err(ContentError::InvalidFormat(format!(
                "no usable entries for topic '{}'",
                topic
            )));
        }

        let cached = self.cache.put(topic, items)?;
        log::info!(
            "Cached {} items for '{}' ({})",
            cached.items.len(),
            cached.topic,
            cached.language
        );
        Ok(cached.items)
    }

    /// Topics available from the cache
    pub fn topics(&self) -> Result<Vec<String>> {
        self.cache.topics()
    }

    /// Items of every readable cached topic, in topic order.
    ///
    /// A topic whose document cannot be read is skipped so the rest stay usable.
    pub fn all_topic_items(&self) -> Result<Vec<(String, Vec<VocabularyItem>)>> {
        let mut all = Vec::new();
        for topic in self.topics()? {
            match self.items(&topic) {
                Ok(items) => all.push((topic, items)),
                Err(e) => log::warn!("Skipping topic '{}': {}", topic, e),
            }
        }
        Ok(all)
    }
}

impl<S: KeyValueStore> ContentProvider for CachedContentProvider<S> {
    fn items(&self, topic: &str) -> Result<Vec<VocabularyItem>> {
        let cached = self
            .cache
            .get(topic)
            .ok_or_else(|| ContentError::TopicNotFound(topic.trim().to_string()))?;

        let mut items = cached.items;
        if let Some(max) = self.config.max_items_per_topic {
            items.truncate(max);
        }
        Ok(items)
    }
}
