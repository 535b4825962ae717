//! Validation of generated vocabulary content
//!
//! Accepted shapes:
//! - a bare array of entries
//! - an object holding the array under `items`, `words` or `vocabulary`
//!
//! Either may be wrapped in a markdown code fence.

use std::collections::HashSet;

use serde_json::Value;

use super::errors::{ContentError, Result};
use super::models::{GeneratedEntry, VocabularyItem};

const LIST_FIELDS: [&str; 3] = ["items", "words", "vocabulary"];

/// Parse generated content into validated vocabulary items
///
/// Entries without a word are dropped. A missing id is derived from
/// topic + word, and the first entry wins when ids repeat.
pub fn parse_generated_content(topic: &str, raw: &str) -> Result<Vec<VocabularyItem>> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => LIST_FIELDS
            .iter()
            .find_map(|field| match map.remove(*field) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or_else(|| {
                ContentError::InvalidFormat(format!(
                    "expected an array or an object with one of {:?}",
                    LIST_FIELDS
                ))
            })?,
        other => {
            return Err(ContentError::InvalidFormat(format!(
                "expected an array, got {}",
                json_type(&other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let entry: GeneratedEntry = match serde_json::from_value(entry) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping generated entry {} for '{}': {}", index, topic, e);
                continue;
            }
        };

        let Some(item) = validate_entry(topic, entry) else {
            log::warn!("Skipping generated entry {} for '{}': no word", index, topic);
            continue;
        };

        if !seen.insert(item.id.clone()) {
            log::debug!("Dropping duplicate entry '{}' for '{}'", item.id, topic);
            continue;
        }
        items.push(item);
    }

    Ok(items)
}

fn validate_entry(topic: &str, entry: GeneratedEntry) -> Option<VocabularyItem> {
    let word = non_empty(entry.word)?;
    let id = non_empty(entry.id).unwrap_or_else(|| VocabularyItem::derive_id(topic, &word));

    Some(VocabularyItem {
        id,
        word,
        translation: non_empty(entry.translation).unwrap_or_default(),
        example: non_empty(entry.example),
        pronunciation: non_empty(entry.pronunciation),
        notes: non_empty(entry.notes),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
