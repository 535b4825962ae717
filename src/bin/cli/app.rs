use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use lingo_lib::config::AppConfig;
use lingo_lib::content::{CachedContentProvider, ContentProvider, VocabularyItem};
use lingo_lib::kv::FileStore;
use lingo_lib::srs::{ReviewSession, SrsRepository};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub session: ReviewSession<Arc<FileStore>>,
    pub provider: CachedContentProvider<Arc<FileStore>>,
}

/// An item found in the content cache
pub struct ResolvedItem {
    pub topic: String,
    pub item: VocabularyItem,
}

impl App {
    /// Load config and open the store
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::load_or_default(config_path)
            .context("Failed to load config")?;
        if data_dir.is_some() {
            config.storage.data_dir = data_dir;
        }

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let store = FileStore::new(data_dir.clone())
            .with_context(|| format!("Failed to open store in {}", data_dir.display()))?
            .with_quota(config.storage.quota_bytes);
        let store = Arc::new(store);
        log::debug!("Using store at {}", store.store_dir().display());

        let repository = SrsRepository::with_key(Arc::clone(&store), config.storage.records_key.clone());
        log::debug!("Scheduling records under '{}'", repository.records_key());
        let session = ReviewSession::new(repository);
        let provider = CachedContentProvider::new(store, config.content.clone());

        Ok(Self {
            config,
            session,
            provider,
        })
    }

    pub fn topic_items(&self, topic: &str) -> Result<Vec<VocabularyItem>> {
        Ok(self.provider.items(topic)?)
    }

    /// Every cached item, tagged with its topic; unreadable topics are skipped
    pub fn all_items(&self) -> Result<Vec<ResolvedItem>> {
        let mut all = Vec::new();
        for (topic, items) in self.provider.all_topic_items()? {
            for item in items {
                all.push(ResolvedItem {
                    topic: topic.clone(),
                    item,
                });
            }
        }
        Ok(all)
    }

    /// Find an item by id, then by word (case-insensitive)
    pub fn find_item(&self, query: &str) -> Result<Option<ResolvedItem>> {
        let all = self.all_items()?;

        if let Some(pos) = all.iter().position(|r| r.item.id == query) {
            return Ok(all.into_iter().nth(pos));
        }

        let matches = word_matches(&all, query);
        if matches.len() > 1 {
            let topics: Vec<&str> = matches.iter().map(|&i| all[i].topic.as_str()).collect();
            log::warn!(
                "'{}' is in several topics ({}), using '{}'; pass the item id to pick another",
                query,
                topics.join(", "),
                topics[0]
            );
        }
        Ok(matches.first().and_then(|&i| all.into_iter().nth(i)))
    }

    /// Resolve a query to the item id used for scheduling
    pub fn resolve_id(&self, query: &str) -> Result<(String, Option<ResolvedItem>)> {
        match self.find_item(query)? {
            Some(resolved) => Ok((resolved.item.id.clone(), Some(resolved))),
            None => {
                log::warn!("'{}' is not in any cached topic, using it as a raw item id", query);
                Ok((query.to_string(), None))
            }
        }
    }
}

/// Positions of items whose word equals `query`, ignoring case
fn word_matches(items: &[ResolvedItem], query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, r)| r.item.word.to_lowercase() == query)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();
        let app = App::new(Some(&config_path), Some(temp_dir.path().join("data"))).unwrap();
        (app, temp_dir)
    }

    #[test]
    fn test_word_in_two_topics_resolves_to_first_topic() {
        let (app, _temp) = create_test_app();
        app.provider
            .import("food", r#"[{"word": "naranja", "translation": "orange"}]"#)
            .unwrap();
        app.provider
            .import("colors", r#"[{"word": "Naranja", "translation": "orange"}]"#)
            .unwrap();

        let all = app.all_items().unwrap();
        assert_eq!(word_matches(&all, " NARANJA ").len(), 2);

        let found = app.find_item("naranja").unwrap().unwrap();
        assert_eq!(found.topic, "colors");

        // An id is never ambiguous
        let food_id = VocabularyItem::derive_id("food", "naranja");
        let found = app.find_item(&food_id).unwrap().unwrap();
        assert_eq!(found.topic, "food");
    }

    #[test]
    fn test_corrupt_topic_does_not_block_lookups() {
        let (app, temp) = create_test_app();
        app.provider
            .import("numbers", r#"[{"word": "uno", "translation": "one"}]"#)
            .unwrap();
        std::fs::write(
            temp.path().join("data").join("store").join("content%3Aes%3Afood.json"),
            "{broken",
        )
        .unwrap();

        assert_eq!(app.all_items().unwrap().len(), 1);
        let (id, resolved) = app.resolve_id("uno").unwrap();
        assert_eq!(resolved.unwrap().topic, "numbers");
        assert_eq!(id, VocabularyItem::derive_id("numbers", "uno"));
    }
}
