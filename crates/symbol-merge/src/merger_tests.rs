#[cfg(test)]
mod tests {
    use crate::merger::SymbolMerger;
    use crate::normalize::{normalize_record, normalize_records};
    use serde_json::{json, Value};

    #[test]
    fn keys_are_lowercased_except_symbol() {
        let raw = json!({
            "Symbol": "AbCd",
            "OutstandingShares": 2_000_000.0,
            "Float": 800_000.0
        });
        let normalized = normalize_record(&raw).unwrap();
        assert_eq!(normalized["symbol"], json!("AbCd"));
        assert_eq!(normalized["outstandingshares"], json!(2_000_000.0));
        assert_eq!(normalized["float"], json!(800_000.0));
        assert!(normalized.get("OutstandingShares").is_none());
    }

    #[test]
    fn records_without_a_symbol_are_dropped() {
        let batch = vec![
            json!({"Float": 1.0}),
            json!({"symbol": "", "Float": 1.0}),
            json!("not an object"),
            json!({"SYMBOL": "ABCD", "Float": 1.0}),
        ];
        let kept = normalize_records(&batch);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["symbol"], json!("ABCD"));
    }

    #[test]
    fn later_sources_take_precedence() {
        let fundamentals = vec![json!({"symbol": "ABCD", "name": "Abcd Inc", "float": 800_000.0})];
        let prices = vec![json!({"symbol": "ABCD", "day_high": 3.2, "float": 900_000.0})];

        let merged = SymbolMerger::new().merge(&["ABCD".to_string()], &[fundamentals, prices]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["name"], json!("Abcd Inc"));
        assert_eq!(merged[0]["day_high"], json!(3.2));
        // The price source supplied float too, so it wins
        assert_eq!(merged[0]["float"], json!(900_000.0));
    }

    #[test]
    fn null_values_do_not_erase_earlier_data() {
        let first = vec![json!({"symbol": "ABCD", "float": 800_000.0})];
        let second = vec![json!({"symbol": "ABCD", "float": null, "day_high": 3.2})];

        let merged = SymbolMerger::new().merge(&["ABCD".to_string()], &[first, second]);
        assert_eq!(merged[0]["float"], json!(800_000.0));
        assert_eq!(merged[0]["day_high"], json!(3.2));
    }

    #[test]
    fn template_spans_the_key_superset() {
        let first = vec![json!({"symbol": "ABCD", "float": 800_000.0})];
        let second = vec![json!({"symbol": "ABCD", "day_high": null})];

        let merged = SymbolMerger::new().merge(&["ABCD".to_string()], &[first, second]);
        // day_high appeared in a source, so the template carries it as null
        assert_eq!(merged[0]["day_high"], Value::Null);
        assert_eq!(merged[0]["float"], json!(800_000.0));
    }

    #[test]
    fn output_follows_requested_symbol_order() {
        let source = vec![
            json!({"symbol": "WXYZ", "float": 2.0}),
            json!({"symbol": "ABCD", "float": 1.0}),
        ];
        let symbols = vec!["ABCD".to_string(), "MISSING".to_string(), "WXYZ".to_string()];

        let merged = SymbolMerger::new().merge(&symbols, &[source]);
        assert_eq!(merged[0]["symbol"], json!("ABCD"));
        assert_eq!(merged[1]["symbol"], json!("MISSING"));
        assert_eq!(merged[2]["symbol"], json!("WXYZ"));
        // A symbol absent from every source still yields a document
        assert_eq!(
            merged[1].as_object().map(|o| o.len()),
            Some(1)
        );
    }

    #[test]
    fn merge_is_deterministic() {
        let fundamentals = vec![json!({"symbol": "ABCD", "Name": "Abcd Inc", "Float": 800_000.0})];
        let prices = vec![json!({"symbol": "ABCD", "day_high": 3.2})];
        let symbols = vec!["ABCD".to_string()];

        let merger = SymbolMerger::new();
        let a = merger.merge(&symbols, &[fundamentals.clone(), prices.clone()]);
        let b = merger.merge(&symbols, &[fundamentals, prices]);
        assert_eq!(a, b);
    }

    #[test]
    fn symbol_casing_survives_the_merge() {
        let source = vec![json!({"Symbol": "BrkA", "float": 1.0})];
        let merged = SymbolMerger::new().merge(&["BrkA".to_string()], &[source]);
        assert_eq!(merged[0]["symbol"], json!("BrkA"));
    }
}
