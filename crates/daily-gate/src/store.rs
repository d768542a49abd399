use async_trait::async_trait;
use dashmap::DashMap;
use scanner_core::{DocumentFilter, DocumentKey, DocumentStore, ScanError};
use serde_json::Value;

/// In-memory `DocumentStore` used by tests and local runs. Documents are
/// JSON objects keyed per collection by (symbol, date); upsert performs a
/// shallow object merge so later patches amend rather than replace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, DashMap<DocumentKey, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, ScanError> {
        let docs = match self.collections.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };

        let mut matches: Vec<(DocumentKey, Value)> = docs
            .iter()
            .filter(|entry| {
                let key = entry.key();
                if !filter.symbols.is_empty() && !filter.symbols.contains(&key.symbol) {
                    return false;
                }
                if !filter.dates.is_empty() && !filter.dates.contains(&key.date) {
                    return false;
                }
                if let Some(field) = &filter.has_field {
                    if entry.value().get(field).map_or(true, Value::is_null) {
                        return false;
                    }
                }
                true
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        // DashMap iteration order is arbitrary; sort for stable results.
        matches.sort_by(|(a, _), (b, _)| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));
        Ok(matches.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn upsert(
        &self,
        collection: &str,
        key: &DocumentKey,
        patch: Value,
    ) -> Result<(), ScanError> {
        let patch = match patch {
            Value::Object(map) => map,
            other => {
                return Err(ScanError::Store(format!(
                    "upsert patch must be an object, got {}",
                    other
                )))
            }
        };

        let docs = self
            .collections
            .entry(collection.to_string())
            .or_default();
        let mut entry = docs
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Default::default()));
        if let Some(existing) = entry.value_mut().as_object_mut() {
            // Null patch fields never erase previously stored data
            for (k, v) in patch {
                if !v.is_null() {
                    existing.insert(k, v);
                }
            }
        }
        Ok(())
    }
}
