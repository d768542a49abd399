use chart_analysis::ChartAnalyzer;
use chrono::{NaiveDate, Utc};
use daily_gate::{AnalysisKind, DailyGate};
use dilution_analysis::DilutionClassifier;
use scanner_core::{
    BarFeed, BarInterval, DilutionAssessment, DocumentFilter, DocumentKey, DocumentStore,
    FundamentalRecord, FundamentalsFeed, MergedSymbolRecord, NewsAdvisor, RegulatoryFeed,
    ScanError,
};
use serde_json::{json, Value};
use squeeze_analysis::SqueezeScanner;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{validate_symbols, PipelineConfig};

/// Result of one pipeline run: the merged record for every symbol, plus
/// the dilution assessments freshly computed this run (cached ones are
/// amended onto the records but not repeated here).
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub records: Vec<MergedSymbolRecord>,
    pub new_sec_analyses: Vec<DilutionAssessment>,
}

/// Sequential per-symbol scan pipeline. Collaborators are trait objects
/// so hosts wire in their own vendor clients and store; every external
/// failure degrades the affected fields and the batch continues.
pub struct Pipeline {
    config: PipelineConfig,
    analyzer: ChartAnalyzer,
    scanner: SqueezeScanner,
    classifier: DilutionClassifier,
    bars: Arc<dyn BarFeed>,
    fundamentals: Arc<dyn FundamentalsFeed>,
    regulatory: Arc<dyn RegulatoryFeed>,
    advisor: Arc<dyn NewsAdvisor>,
    store: Arc<dyn DocumentStore>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        bars: Arc<dyn BarFeed>,
        fundamentals: Arc<dyn FundamentalsFeed>,
        regulatory: Arc<dyn RegulatoryFeed>,
        advisor: Arc<dyn NewsAdvisor>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, ScanError> {
        config.validate()?;
        let analyzer = ChartAnalyzer::new()
            .with_market_open(config.market_open)
            .with_open_range(config.open_range_start, config.open_range_end)
            .with_key_level_count(config.key_level_count);
        Ok(Self {
            config,
            analyzer,
            scanner: SqueezeScanner::new(),
            classifier: DilutionClassifier::new(),
            bars,
            fundamentals,
            regulatory,
            advisor,
            store,
        })
    }

    /// Run for "today" in the configured exchange timezone.
    pub async fn run(&self, symbols: &[String]) -> Result<PipelineOutcome, ScanError> {
        let today = Utc::now().with_timezone(&self.config.timezone).date_naive();
        self.run_for_date(symbols, today).await
    }

    pub async fn run_for_date(
        &self,
        symbols: &[String],
        today: NaiveDate,
    ) -> Result<PipelineOutcome, ScanError> {
        validate_symbols(symbols)?;
        info!(symbols = symbols.len(), date = %today, "starting scan batch");

        let fundamentals = self.fetch_fundamentals(symbols).await;

        let mut records = Vec::with_capacity(symbols.len());
        for (index, symbol) in symbols.iter().enumerate() {
            self.pace(index).await;

            let mut record = self.load_or_template(symbol, today).await;
            if let Some(f) = fundamentals.get(symbol.as_str()) {
                record.apply_fundamentals(f);
            }

            let snapshot = {
                let m1 = self.fetch_bars(symbol, BarInterval::Min1).await;
                let m5 = self.fetch_bars(symbol, BarInterval::Min5).await;
                let d1 = self.fetch_bars(symbol, BarInterval::Day1).await;
                self.analyzer.snapshot(symbol, &m1, &m5, &d1)
            };
            record.apply_snapshot(&snapshot);

            // Cheap and local, so recomputed on every run. Flattened SEC
            // figures and the suggestion come from the loaded document
            // when a prior run today already produced them.
            let assessment =
                self.scanner
                    .assess(&record, record.day_close, record.day_high, None, today);
            debug!("{}", squeeze_analysis::render_report(&record, &assessment));
            record.apply_squeeze(&assessment);

            self.persist(&record, today).await;
            records.push(record);
        }

        let gate = DailyGate::new(self.store.clone(), self.config.collection.clone());
        self.suggestion_pass(&gate, symbols, today, &mut records).await;
        let new_sec_analyses = self.sec_pass(&gate, symbols, today, &mut records).await;

        info!(
            records = records.len(),
            new_sec_analyses = new_sec_analyses.len(),
            "scan batch finished"
        );
        Ok(PipelineOutcome {
            records,
            new_sec_analyses,
        })
    }

    /// Fixed inter-symbol pause, scaled by how many symbols have already
    /// been processed, to stay inside provider quotas.
    async fn pace(&self, index: usize) {
        let secs = (self.config.pause_step_secs * index as f64).max(self.config.base_pause_secs);
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    async fn fetch_fundamentals(&self, symbols: &[String]) -> HashMap<String, FundamentalRecord> {
        match self.fundamentals.fetch_symbols(symbols).await {
            Ok(list) => list.into_iter().map(|f| (f.symbol.clone(), f)).collect(),
            Err(e) => {
                warn!("fundamentals batch fetch failed: {}", e);
                HashMap::new()
            }
        }
    }

    async fn fetch_bars(&self, symbol: &str, interval: BarInterval) -> Vec<scanner_core::Bar> {
        match self.bars.fetch(symbol, interval).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!("bar fetch failed for {} ({:?}): {}", symbol, interval, e);
                Vec::new()
            }
        }
    }

    /// Start from today's stored document when one exists so reruns amend
    /// rather than reset the record.
    async fn load_or_template(&self, symbol: &str, today: NaiveDate) -> MergedSymbolRecord {
        let filter = DocumentFilter::symbols_on(&[symbol.to_string()], today);
        match self.store.find(&self.config.collection, &filter).await {
            Ok(docs) => {
                for doc in docs {
                    match serde_json::from_value::<MergedSymbolRecord>(doc) {
                        Ok(mut record) => {
                            debug!("resuming today's record for {}", symbol);
                            record.symbol = symbol.to_string();
                            record.today_date = today;
                            return record;
                        }
                        Err(e) => warn!("ignoring malformed stored record for {}: {}", symbol, e),
                    }
                }
            }
            Err(e) => warn!("store read failed for {}: {}", symbol, e),
        }
        MergedSymbolRecord::template(symbol, today)
    }

    async fn persist(&self, record: &MergedSymbolRecord, today: NaiveDate) {
        let patch = match serde_json::to_value(record) {
            Ok(patch) => patch,
            Err(e) => {
                warn!("could not serialize record for {}: {}", record.symbol, e);
                return;
            }
        };
        let key = DocumentKey::new(record.symbol.clone(), today);
        if let Err(e) = self.store.upsert(&self.config.collection, &key, patch).await {
            warn!("store upsert failed for {}: {}", record.symbol, e);
        }
    }

    async fn suggestion_pass(
        &self,
        gate: &DailyGate,
        symbols: &[String],
        today: NaiveDate,
        records: &mut [MergedSymbolRecord],
    ) {
        let split = match gate.partition(symbols, today, AnalysisKind::Suggestion).await {
            Ok(split) => split,
            Err(e) => {
                warn!("suggestion gate failed: {}", e);
                return;
            }
        };

        for doc in &split.cached {
            if let (Some(symbol), Some(text)) = (
                doc.get("symbol").and_then(Value::as_str),
                doc.get("suggestion").and_then(Value::as_str),
            ) {
                if let Some(record) = records.iter_mut().find(|r| r.symbol == symbol) {
                    record.apply_suggestion(text);
                }
            }
        }

        if split.needs_analysis.is_empty() {
            return;
        }
        info!(pending = split.needs_analysis.len(), "requesting news suggestions");
        let suggestions = match self.advisor.summarize_and_advise(&split.needs_analysis).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!("news advisor call failed: {}", e);
                return;
            }
        };

        for s in suggestions {
            let key = DocumentKey::new(s.symbol.clone(), today);
            let patch = json!({"symbol": s.symbol, "suggestion": s.suggestion});
            if let Err(e) = self.store.upsert(&self.config.collection, &key, patch).await {
                warn!("suggestion upsert failed for {}: {}", s.symbol, e);
            }
            if let Some(record) = records.iter_mut().find(|r| r.symbol == s.symbol) {
                record.apply_suggestion(&s.suggestion);
            }
        }
    }

    async fn sec_pass(
        &self,
        gate: &DailyGate,
        symbols: &[String],
        today: NaiveDate,
        records: &mut [MergedSymbolRecord],
    ) -> Vec<DilutionAssessment> {
        let split = match gate
            .partition(symbols, today, AnalysisKind::SecFilingAnalysis)
            .await
        {
            Ok(split) => split,
            Err(e) => {
                warn!("SEC gate failed: {}", e);
                return Vec::new();
            }
        };

        for doc in &split.cached {
            let symbol = doc.get("symbol").and_then(Value::as_str);
            let analysis = doc
                .get("sec_filing_analysis")
                .cloned()
                .map(serde_json::from_value::<DilutionAssessment>);
            if let (Some(symbol), Some(Ok(analysis))) = (symbol, analysis) {
                if let Some(record) = records.iter_mut().find(|r| r.symbol == symbol) {
                    record.apply_sec_analysis(&analysis);
                }
            }
        }

        if split.needs_analysis.is_empty() {
            return Vec::new();
        }
        info!(pending = split.needs_analysis.len(), "running SEC dilution analysis");
        let cik_map = match self.regulatory.cik_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!("CIK map fetch failed: {}", e);
                return Vec::new();
            }
        };

        let mut fresh = Vec::new();
        for (index, symbol) in split.needs_analysis.iter().enumerate() {
            self.pace(index).await;

            let stored_cik = records
                .iter()
                .find(|r| &r.symbol == symbol)
                .and_then(|r| r.cik.clone());
            let cik = match stored_cik.or_else(|| cik_map.get(symbol).cloned()) {
                Some(cik) => cik,
                None => {
                    warn!("no CIK found for {}, skipping SEC analysis", symbol);
                    continue;
                }
            };

            let filings = match self.regulatory.list_filings(&cik).await {
                Ok(filings) => filings,
                Err(e) => {
                    warn!("filings fetch failed for {}: {}", symbol, e);
                    continue;
                }
            };
            let facts = match self.regulatory.financial_facts(&cik).await {
                Ok(facts) => facts,
                Err(e) => {
                    warn!("financial facts fetch failed for {}: {}", symbol, e);
                    continue;
                }
            };

            let assessment = self
                .classifier
                .classify(symbol, Some(&cik), &filings, &facts, today);

            if let Some(record) = records.iter_mut().find(|r| &r.symbol == symbol) {
                record.apply_sec_analysis(&assessment);
                self.persist(record, today).await;
            }
            fresh.push(assessment);
        }
        fresh
    }
}
