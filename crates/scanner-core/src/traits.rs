use crate::{
    Bar, BarInterval, Filing, FinancialFacts, FundamentalRecord, ScanError, SymbolSuggestion,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

/// Market-data vendor supplying ordered bar series.
#[async_trait]
pub trait BarFeed: Send + Sync {
    async fn fetch(&self, symbol: &str, interval: BarInterval) -> Result<Vec<Bar>, ScanError>;
}

/// Vendor supplying company fundamentals.
#[async_trait]
pub trait FundamentalsFeed: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<Option<FundamentalRecord>, ScanError>;

    /// Batch fetch; per-symbol failures drop the symbol rather than
    /// failing the batch.
    async fn fetch_symbols(&self, symbols: &[String]) -> Result<Vec<FundamentalRecord>, ScanError> {
        let mut records = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.fetch(symbol).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => tracing::warn!("fundamentals fetch failed for {}: {}", symbol, e),
            }
        }
        Ok(records)
    }
}

/// Regulatory data source: filings and labeled financial facts per CIK.
#[async_trait]
pub trait RegulatoryFeed: Send + Sync {
    /// Ticker -> zero-padded CIK identifier map.
    async fn cik_map(&self) -> Result<HashMap<String, String>, ScanError>;

    async fn list_filings(&self, cik: &str) -> Result<Vec<Filing>, ScanError>;

    async fn financial_facts(&self, cik: &str) -> Result<FinancialFacts, ScanError>;
}

/// Text-generation service turning raw news into a trading suggestion.
#[async_trait]
pub trait NewsAdvisor: Send + Sync {
    async fn summarize_and_advise(
        &self,
        symbols: &[String],
    ) -> Result<Vec<SymbolSuggestion>, ScanError>;
}

/// Key of one logical document: exactly one record per (symbol, date).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub symbol: String,
    pub date: NaiveDate,
}

impl DocumentKey {
    pub fn new(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
        }
    }
}

/// Store query: symbol membership, date membership, field existence.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub symbols: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub has_field: Option<String>,
}

impl DocumentFilter {
    pub fn symbols_on(symbols: &[String], date: NaiveDate) -> Self {
        Self {
            symbols: symbols.to_vec(),
            dates: vec![date],
            has_field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.has_field = Some(field.into());
        self
    }
}

/// Document-oriented persistent store. `upsert` must merge the patch into
/// any existing document for the key, never replace the whole document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &DocumentFilter)
        -> Result<Vec<Value>, ScanError>;

    async fn upsert(
        &self,
        collection: &str,
        key: &DocumentKey,
        patch: Value,
    ) -> Result<(), ScanError>;
}
