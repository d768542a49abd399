use chrono::NaiveDate;
use scanner_core::{DocumentFilter, DocumentStore, ScanError};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Expensive per-day analyses the gate memoizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Suggestion,
    SecFilingAnalysis,
}

impl AnalysisKind {
    /// Document field whose presence marks the analysis as done.
    pub fn field(&self) -> &'static str {
        match self {
            AnalysisKind::Suggestion => "suggestion",
            AnalysisKind::SecFilingAnalysis => "sec_filing_analysis",
        }
    }
}

/// Split of a symbol batch into already-analyzed documents and the
/// symbols still needing a fresh analysis today.
#[derive(Debug, Clone, Default)]
pub struct GatePartition {
    pub cached: Vec<Value>,
    pub needs_analysis: Vec<String>,
}

/// Per-day memoization gate over the document store. An analysis counts
/// as done for (symbol, date) when that day's document carries a
/// non-null field for the analysis kind.
pub struct DailyGate {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl DailyGate {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Partition `symbols` for `date`, preserving input order in
    /// `needs_analysis`.
    pub async fn partition(
        &self,
        symbols: &[String],
        date: NaiveDate,
        kind: AnalysisKind,
    ) -> Result<GatePartition, ScanError> {
        let filter = DocumentFilter::symbols_on(symbols, date).with_field(kind.field());
        let cached = self.store.find(&self.collection, &filter).await?;

        let done: Vec<&str> = cached
            .iter()
            .filter_map(|doc| doc.get("symbol").and_then(Value::as_str))
            .collect();
        let needs_analysis: Vec<String> = symbols
            .iter()
            .filter(|s| !done.contains(&s.as_str()))
            .cloned()
            .collect();

        debug!(
            field = kind.field(),
            cached = cached.len(),
            pending = needs_analysis.len(),
            "daily gate partition"
        );
        Ok(GatePartition {
            cached,
            needs_analysis,
        })
    }
}
