use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// OHLCV bar. Timestamps are exchange-local (naive) so that time-of-day
/// comparisons against the 09:30 market open work without conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bar granularity used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarInterval {
    Min1,
    Min5,
    Day1,
}

impl BarInterval {
    pub fn to_minutes(&self) -> i64 {
        match self {
            BarInterval::Min1 => 1,
            BarInterval::Min5 => 5,
            BarInterval::Day1 => 1440,
        }
    }
}

/// Per-symbol, per-trading-day price statistics derived from bar series.
/// Every metric is null when the underlying bar set is empty; `day_low`
/// reflects market-session bars only while `day_high` includes premarket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub premarket_high: Option<f64>,
    pub premarket_low: Option<f64>,
    pub market_open_high: Option<f64>,
    pub market_open_low: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub day_close: Option<f64>,
    pub yesterday_close: Option<f64>,
    pub high_change_percentage: Option<f64>,
    pub close_change_percentage: Option<f64>,
    pub most_volume_high: Option<f64>,
    pub most_volume_low: Option<f64>,
    /// Nearest resistance levels above the current day high, ascending.
    pub key_levels: Vec<f64>,
}

/// Company fundamentals as reported by the vendor feed. Field names follow
/// the vendor's keys after lower-casing; `symbol` keeps its original case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "listingexchange")]
    pub listing_exchange: Option<String>,
    #[serde(default, rename = "securitytype")]
    pub security_type: Option<String>,
    #[serde(default, rename = "countrydomicile")]
    pub country_domicile: Option<String>,
    #[serde(default, rename = "countryincorporation")]
    pub country_incorporation: Option<String>,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default, rename = "lastsplitinfo")]
    pub last_split_info: Option<String>,
    #[serde(default, rename = "lastsplitdate")]
    pub last_split_date: Option<String>,
    #[serde(default, rename = "lotsize")]
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub optionable: Option<bool>,
    #[serde(default, rename = "earningspershare")]
    pub earnings_per_share: Option<f64>,
    #[serde(default, rename = "earningspersharettm")]
    pub earnings_per_share_ttm: Option<f64>,
    #[serde(default, rename = "forwardearningspershare")]
    pub forward_earnings_per_share: Option<f64>,
    #[serde(default, rename = "nextearnings")]
    pub next_earnings: Option<String>,
    #[serde(default, rename = "annualdividend")]
    pub annual_dividend: Option<f64>,
    #[serde(default, rename = "last12monthdividend")]
    pub last_12_month_dividend: Option<f64>,
    #[serde(default, rename = "lastdividend")]
    pub last_dividend: Option<f64>,
    #[serde(default, rename = "exdividend")]
    pub ex_dividend: Option<String>,
    #[serde(default, rename = "dividendfrequency")]
    pub dividend_frequency: Option<String>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default, rename = "averagevolume3m")]
    pub average_volume_3m: Option<f64>,
    #[serde(default, rename = "turnoverpercentage")]
    pub turnover_percentage: Option<f64>,
    #[serde(default, rename = "bookvalue")]
    pub book_value: Option<f64>,
    #[serde(default)]
    pub sales: Option<f64>,
    #[serde(default, rename = "outstandingshares")]
    pub outstanding_shares: Option<f64>,
    #[serde(default)]
    pub float: Option<f64>,
    #[serde(default)]
    pub cik: Option<String>,
}

/// Float liquidity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatRisk {
    #[serde(rename = "Extreme Risk (Float <1M)")]
    Extreme,
    #[serde(rename = "High Risk (1M<=Float<5M)")]
    High,
    #[serde(rename = "Acceptable")]
    Acceptable,
}

/// Float / outstanding-shares ratio bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloatRatioRisk {
    #[serde(rename = "Warning (Float/Outstanding <40%)")]
    Warning,
    #[serde(rename = "Normal")]
    Normal,
}

/// Composite short-squeeze assessment. All values serialize to plain
/// numeric/boolean/string primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqueezeAssessment {
    pub symbol: String,
    pub float_risk: Option<FloatRisk>,
    pub float_ratio: Option<f64>,
    pub float_ratio_risk: Option<FloatRatioRisk>,
    pub market_cap: Option<f64>,
    pub cash_to_market_cap: Option<f64>,
    pub cash_crisis: Option<i64>,
    pub short_ratio: Option<f64>,
    pub squeeze_score: f64,
    pub atm_urgency: i64,
    pub resistance_ok: bool,
    pub hype_score: i64,
    pub short_signal: bool,
}

/// ATM offering risk bucket, ordered from benign to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtmRiskLevel {
    None,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl AtmRiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AtmRiskLevel::None => "None",
            AtmRiskLevel::Medium => "Medium",
            AtmRiskLevel::MediumHigh => "Medium-High",
            AtmRiskLevel::High => "High",
            AtmRiskLevel::VeryHigh => "Very High",
        }
    }
}

/// Confidence attached to a trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

/// Cash position relative to the industry median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashBenchmark {
    Above,
    Below,
}

/// Dilution / ATM-offering risk classification for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionAssessment {
    pub symbol: String,
    pub cik: Option<String>,
    pub cash: Option<f64>,
    pub debt: Option<f64>,
    pub cash_debt_ratio: Option<f64>,
    pub burn_rate_months: Option<f64>,
    pub total_shelf_filings: usize,
    pub valid_shelf_filings: usize,
    pub last_shelf_date: Option<NaiveDate>,
    pub atm_risk_level: AtmRiskLevel,
    pub risk_reason: String,
    pub industry_cash_benchmark: CashBenchmark,
    pub trading_recommendation: String,
    pub confidence: ConfidenceLevel,
    pub reasons: Vec<String>,
    pub strategy: String,
    pub short_squeeze_risk: String,
    pub data_date: NaiveDate,
}

/// A regulatory filing header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    pub form: String,
    pub date: NaiveDate,
}

/// One dated observation for a labeled financial metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactEntry {
    pub end: NaiveDate,
    pub val: f64,
}

/// Financial facts keyed by metric name. A metric may be reported under
/// several alternate names; callers probe names in preference order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialFacts {
    pub metrics: HashMap<String, Vec<FactEntry>>,
}

impl FinancialFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entries: Vec<FactEntry>) {
        self.metrics.insert(name.into(), entries);
    }

    pub fn series(&self, name: &str) -> Option<&[FactEntry]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

/// News-derived trading suggestion for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSuggestion {
    pub symbol: String,
    pub suggestion: String,
}

/// Unified per-(symbol, date) record: the flat union of fundamentals,
/// price snapshot, squeeze assessment, and the day's memoized analyses.
/// Amendment methods overwrite only the fields their source supplies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergedSymbolRecord {
    pub symbol: String,
    pub today_date: NaiveDate,

    // Fundamentals
    pub name: Option<String>,
    pub listing_exchange: Option<String>,
    pub security_type: Option<String>,
    pub country_domicile: Option<String>,
    pub country_incorporation: Option<String>,
    pub isin: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub last_split_info: Option<String>,
    pub last_split_date: Option<String>,
    pub lot_size: Option<f64>,
    pub optionable: Option<bool>,
    pub earnings_per_share: Option<f64>,
    pub earnings_per_share_ttm: Option<f64>,
    pub forward_earnings_per_share: Option<f64>,
    pub next_earnings: Option<String>,
    pub annual_dividend: Option<f64>,
    pub last_12_month_dividend: Option<f64>,
    pub last_dividend: Option<f64>,
    pub ex_dividend: Option<String>,
    pub dividend_frequency: Option<String>,
    pub beta: Option<f64>,
    pub average_volume_3m: Option<f64>,
    pub turnover_percentage: Option<f64>,
    pub book_value: Option<f64>,
    pub sales: Option<f64>,
    pub outstanding_shares: Option<f64>,
    pub float: Option<f64>,
    pub cik: Option<String>,

    // Price snapshot
    pub premarket_high: Option<f64>,
    pub premarket_low: Option<f64>,
    pub market_open_high: Option<f64>,
    pub market_open_low: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub day_close: Option<f64>,
    pub yesterday_close: Option<f64>,
    pub high_change_percentage: Option<f64>,
    pub close_change_percentage: Option<f64>,
    pub most_volume_high: Option<f64>,
    pub most_volume_low: Option<f64>,
    pub key_levels: Option<Vec<f64>>,

    // Squeeze assessment
    pub float_risk: Option<FloatRisk>,
    pub float_ratio: Option<f64>,
    pub float_ratio_risk: Option<FloatRatioRisk>,
    pub market_cap: Option<f64>,
    pub cash_to_market_cap: Option<f64>,
    pub cash_crisis: Option<i64>,
    pub short_ratio: Option<f64>,
    pub squeeze_score: Option<f64>,
    pub atm_urgency: Option<i64>,
    pub resistance_ok: Option<bool>,
    pub hype_score: Option<i64>,
    pub short_signal: Option<bool>,

    // Flattened regulatory figures, copied when the SEC analysis lands so
    // the squeeze scorer can read them on later runs.
    pub cash_usd: Option<f64>,
    pub debt_usd: Option<f64>,
    pub burn_rate_months: Option<f64>,
    pub last_shelf_date: Option<NaiveDate>,

    // Memoized per-day analyses
    pub suggestion: Option<String>,
    pub sec_filing_analysis: Option<DilutionAssessment>,
}

impl MergedSymbolRecord {
    /// All-null template for one (symbol, date) key.
    pub fn template(symbol: &str, today_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_string(),
            today_date,
            ..Self::default()
        }
    }

    /// Overlay vendor fundamentals. The record's symbol is authoritative
    /// and is not replaced by the source's casing.
    pub fn apply_fundamentals(&mut self, f: &FundamentalRecord) {
        self.name = f.name.clone().or(self.name.take());
        self.listing_exchange = f.listing_exchange.clone().or(self.listing_exchange.take());
        self.security_type = f.security_type.clone().or(self.security_type.take());
        self.country_domicile = f.country_domicile.clone().or(self.country_domicile.take());
        self.country_incorporation = f
            .country_incorporation
            .clone()
            .or(self.country_incorporation.take());
        self.isin = f.isin.clone().or(self.isin.take());
        self.sector = f.sector.clone().or(self.sector.take());
        self.industry = f.industry.clone().or(self.industry.take());
        self.last_split_info = f.last_split_info.clone().or(self.last_split_info.take());
        self.last_split_date = f.last_split_date.clone().or(self.last_split_date.take());
        self.lot_size = f.lot_size.or(self.lot_size);
        self.optionable = f.optionable.or(self.optionable);
        self.earnings_per_share = f.earnings_per_share.or(self.earnings_per_share);
        self.earnings_per_share_ttm = f.earnings_per_share_ttm.or(self.earnings_per_share_ttm);
        self.forward_earnings_per_share = f
            .forward_earnings_per_share
            .or(self.forward_earnings_per_share);
        self.next_earnings = f.next_earnings.clone().or(self.next_earnings.take());
        self.annual_dividend = f.annual_dividend.or(self.annual_dividend);
        self.last_12_month_dividend = f.last_12_month_dividend.or(self.last_12_month_dividend);
        self.last_dividend = f.last_dividend.or(self.last_dividend);
        self.ex_dividend = f.ex_dividend.clone().or(self.ex_dividend.take());
        self.dividend_frequency = f.dividend_frequency.clone().or(self.dividend_frequency.take());
        self.beta = f.beta.or(self.beta);
        self.average_volume_3m = f.average_volume_3m.or(self.average_volume_3m);
        self.turnover_percentage = f.turnover_percentage.or(self.turnover_percentage);
        self.book_value = f.book_value.or(self.book_value);
        self.sales = f.sales.or(self.sales);
        self.outstanding_shares = f.outstanding_shares.or(self.outstanding_shares);
        self.float = f.float.or(self.float);
        self.cik = f.cik.clone().or(self.cik.take());
    }

    /// Overlay derived price statistics.
    pub fn apply_snapshot(&mut self, s: &PriceSnapshot) {
        self.premarket_high = s.premarket_high.or(self.premarket_high);
        self.premarket_low = s.premarket_low.or(self.premarket_low);
        self.market_open_high = s.market_open_high.or(self.market_open_high);
        self.market_open_low = s.market_open_low.or(self.market_open_low);
        self.day_high = s.day_high.or(self.day_high);
        self.day_low = s.day_low.or(self.day_low);
        self.day_close = s.day_close.or(self.day_close);
        self.yesterday_close = s.yesterday_close.or(self.yesterday_close);
        self.high_change_percentage = s.high_change_percentage.or(self.high_change_percentage);
        self.close_change_percentage = s.close_change_percentage.or(self.close_change_percentage);
        self.most_volume_high = s.most_volume_high.or(self.most_volume_high);
        self.most_volume_low = s.most_volume_low.or(self.most_volume_low);
        // An empty level list on a snapshot without a day high means the
        // bar data was missing, not that no resistance exists; keep any
        // previously stored levels in that case.
        self.key_levels = if s.key_levels.is_empty() && s.day_high.is_none() {
            self.key_levels.take()
        } else {
            Some(s.key_levels.clone())
        };
    }

    /// Overlay the squeeze assessment. Score/urgency/signal fields are
    /// always produced by the scorer, so they always overwrite.
    pub fn apply_squeeze(&mut self, a: &SqueezeAssessment) {
        self.float_risk = a.float_risk.or(self.float_risk);
        self.float_ratio = a.float_ratio.or(self.float_ratio);
        self.float_ratio_risk = a.float_ratio_risk.or(self.float_ratio_risk);
        self.market_cap = a.market_cap.or(self.market_cap);
        self.cash_to_market_cap = a.cash_to_market_cap.or(self.cash_to_market_cap);
        self.cash_crisis = a.cash_crisis.or(self.cash_crisis);
        self.short_ratio = a.short_ratio.or(self.short_ratio);
        self.squeeze_score = Some(a.squeeze_score);
        self.atm_urgency = Some(a.atm_urgency);
        self.resistance_ok = Some(a.resistance_ok);
        self.hype_score = Some(a.hype_score);
        self.short_signal = Some(a.short_signal);
    }

    pub fn apply_suggestion(&mut self, suggestion: &str) {
        self.suggestion = Some(suggestion.to_string());
    }

    /// Attach the SEC analysis and flatten its key figures onto the record.
    pub fn apply_sec_analysis(&mut self, a: &DilutionAssessment) {
        self.cash_usd = a.cash.or(self.cash_usd);
        self.debt_usd = a.debt.or(self.debt_usd);
        self.burn_rate_months = a.burn_rate_months.or(self.burn_rate_months);
        self.last_shelf_date = a.last_shelf_date.or(self.last_shelf_date);
        self.cik = a.cik.clone().or(self.cik.take());
        self.sec_filing_analysis = Some(a.clone());
    }
}
