use serde_json::{Map, Value};
use tracing::warn;

/// Normalize one vendor record's keys: every key is lower-cased except
/// `symbol`, whose key and value keep their original form. Records that
/// are not objects or carry no symbol are dropped.
pub fn normalize_record(record: &Value) -> Option<Value> {
    let obj = match record.as_object() {
        Some(obj) => obj,
        None => {
            warn!("skipping non-object vendor record");
            return None;
        }
    };

    let mut out = Map::with_capacity(obj.len());
    let mut symbol = None;
    for (key, value) in obj {
        if key.eq_ignore_ascii_case("symbol") {
            symbol = Some(value.clone());
        } else {
            out.insert(key.to_lowercase(), value.clone());
        }
    }

    match symbol {
        Some(s) if s.as_str().map_or(false, |s| !s.is_empty()) => {
            out.insert("symbol".to_string(), s);
            Some(Value::Object(out))
        }
        _ => {
            warn!("skipping vendor record without a symbol");
            None
        }
    }
}

/// Normalize a batch, dropping unusable records.
pub fn normalize_records(records: &[Value]) -> Vec<Value> {
    records.iter().filter_map(normalize_record).collect()
}
