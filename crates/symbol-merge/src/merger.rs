use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::normalize::normalize_records;

/// Deterministic precedence merge of per-source record sets into one
/// document per symbol.
///
/// Each source is a batch of vendor records; sources are ordered from
/// lowest to highest precedence. For every requested symbol the merge
/// starts from an all-null template spanning the superset of keys seen
/// for that symbol, then overlays each source's record in order. A
/// source amends only the keys it supplies with non-null values, so a
/// later partial record never erases an earlier one's data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolMerger;

impl SymbolMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merge `sources` for the requested symbols. Output order follows
    /// `symbols`; symbols with no record in any source still produce a
    /// minimal document carrying just the symbol.
    pub fn merge(&self, symbols: &[String], sources: &[Vec<Value>]) -> Vec<Value> {
        let normalized: Vec<Vec<Value>> = sources
            .iter()
            .map(|batch| normalize_records(batch))
            .collect();

        symbols
            .iter()
            .map(|symbol| self.merge_symbol(symbol, &normalized))
            .collect()
    }

    fn merge_symbol(&self, symbol: &str, sources: &[Vec<Value>]) -> Value {
        let records: Vec<&Map<String, Value>> = sources
            .iter()
            .filter_map(|batch| {
                batch
                    .iter()
                    .find(|r| r.get("symbol").and_then(Value::as_str) == Some(symbol))
                    .and_then(Value::as_object)
            })
            .collect();

        // BTreeSet keeps the template key order stable across runs.
        let keys: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();

        let mut merged = Map::new();
        for key in keys {
            merged.insert(key.to_string(), Value::Null);
        }
        merged.insert("symbol".to_string(), Value::String(symbol.to_string()));

        for record in records {
            for (key, value) in record {
                if key != "symbol" && !value.is_null() {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        Value::Object(merged)
    }
}
