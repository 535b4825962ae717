//! Topic content cache on top of the key-value store
//!
//! Each topic is one document under `content:{language}:{topic}`.

use chrono::Utc;

use super::errors::Result;
use super::models::{CachedTopic, VocabularyItem};
use crate::kv::KeyValueStore;

const KEY_PREFIX: &str = "content";

pub struct ContentCache<S> {
    store: S,
    language: String,
}

impl<S: KeyValueStore> ContentCache<S> {
    pub fn new(store: S, language: impl Into<String>) -> Self {
        Self {
            store,
            language: language.into(),
        }
    }

    fn language_prefix(&self) -> String {
        format!("{}:{}:", KEY_PREFIX, self.language)
    }

    /// Store key for a topic
    pub fn key_for(&self, topic: &str) -> String {
        format!("{}{}", self.language_prefix(), normalize_topic(topic))
    }

    /// Cached content for a topic; unreadable entries count as a miss
    pub fn get(&self, topic: &str) -> Option<CachedTopic> {
        let key = self.key_for(topic);
        let value = match self.store.get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read cached content '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(cached) => Some(cached),
            Err(e) => {
                log::warn!("Ignoring malformed cached content '{}': {}", key, e);
                None
            }
        }
    }

    /// Replace the content of a topic
    pub fn put(&self, topic: &str, items: Vec<VocabularyItem>) -> Result<CachedTopic> {
        let cached = CachedTopic {
            topic: normalize_topic(topic),
            language: self.language.clone(),
            items,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&cached)?;
        self.store.set(&self.key_for(topic), &value)?;
        Ok(cached)
    }

    pub fn remove(&self, topic: &str) -> Result<()> {
        self.store.remove(&self.key_for(topic))?;
        Ok(())
    }

    /// Topics cached for this language
    pub fn topics(&self) -> Result<Vec<String>> {
        let prefix = self.language_prefix();
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }
}

fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}
