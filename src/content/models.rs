//! Data models for vocabulary content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::srs::Reviewable;

/// Namespace for ids derived from topic + word
const VOCABULARY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1e_2f0a_93b4_5d7e_8a21_c4f9_0b3d_e615);

/// A validated vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VocabularyItem {
    /// Stable id for a word within a topic
    pub fn derive_id(topic: &str, word: &str) -> String {
        let name = format!("{}/{}", topic.trim().to_lowercase(), word.trim().to_lowercase());
        Uuid::new_v5(&VOCABULARY_NAMESPACE, name.as_bytes()).to_string()
    }
}

impl Reviewable for VocabularyItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// An entry as produced by the content generator, before validation.
///
/// Generators are loose about field names, so common synonyms are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeneratedEntry {
    pub id: Option<String>,
    #[serde(alias = "term", alias = "target")]
    pub word: Option<String>,
    #[serde(alias = "meaning", alias = "definition", alias = "english")]
    pub translation: Option<String>,
    #[serde(alias = "sentence", alias = "exampleSentence", alias = "example_sentence")]
    pub example: Option<String>,
    #[serde(alias = "phonetic", alias = "ipa")]
    pub pronunciation: Option<String>,
    #[serde(alias = "note", alias = "tip")]
    pub notes: Option<String>,
}

/// Content stored for one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTopic {
    pub topic: String,
    pub language: String,
    pub items: Vec<VocabularyItem>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_id_is_stable_and_normalized() {
        let a = VocabularyItem::derive_id("Food", "Manzana");
        let b = VocabularyItem::derive_id(" food ", "manzana ");
        assert_eq!(a, b);
        assert_ne!(a, VocabularyItem::derive_id("fruit", "manzana"));
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
