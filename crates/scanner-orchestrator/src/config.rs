use chrono::NaiveTime;
use chrono_tz::Tz;
use scanner_core::ScanError;
use std::env;

/// Pipeline configuration. `from_env` overlays environment variables on
/// the defaults and validates before any symbol is processed; bad values
/// are a startup failure, never a mid-batch one.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub collection: String,
    /// Exchange-local timezone defining "today" for the memoization gate.
    pub timezone: Tz,
    pub market_open: NaiveTime,
    pub open_range_start: NaiveTime,
    pub open_range_end: NaiveTime,
    pub key_level_count: usize,
    /// Minimum pause between symbols, seconds.
    pub base_pause_secs: f64,
    /// Additional pause per already-processed symbol, seconds.
    pub pause_step_secs: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collection: "stock_analysis".to_string(),
            timezone: chrono_tz::America::New_York,
            market_open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            open_range_start: NaiveTime::from_hms_opt(9, 31, 0).unwrap_or_default(),
            open_range_end: NaiveTime::from_hms_opt(9, 45, 0).unwrap_or_default(),
            key_level_count: 5,
            base_pause_secs: 0.5,
            pause_step_secs: 0.1,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ScanError> {
        dotenvy::dotenv().ok();
        let mut cfg = Self::default();

        if let Ok(v) = env::var("SCANNER_COLLECTION") {
            cfg.collection = v;
        }
        if let Ok(v) = env::var("SCANNER_TIMEZONE") {
            cfg.timezone = v
                .parse()
                .map_err(|_| ScanError::Configuration(format!("unknown timezone {:?}", v)))?;
        }
        if let Ok(v) = env::var("SCANNER_MARKET_OPEN") {
            cfg.market_open = parse_time("SCANNER_MARKET_OPEN", &v)?;
        }
        if let Ok(v) = env::var("SCANNER_OPEN_RANGE_START") {
            cfg.open_range_start = parse_time("SCANNER_OPEN_RANGE_START", &v)?;
        }
        if let Ok(v) = env::var("SCANNER_OPEN_RANGE_END") {
            cfg.open_range_end = parse_time("SCANNER_OPEN_RANGE_END", &v)?;
        }
        if let Ok(v) = env::var("SCANNER_KEY_LEVELS") {
            cfg.key_level_count = v.parse().map_err(|_| {
                ScanError::Configuration(format!("SCANNER_KEY_LEVELS must be an integer, got {:?}", v))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.collection.is_empty() {
            return Err(ScanError::Configuration(
                "collection name must not be empty".to_string(),
            ));
        }
        if self.key_level_count == 0 {
            return Err(ScanError::Configuration(
                "key level count must be at least 1".to_string(),
            ));
        }
        if self.base_pause_secs < 0.0 || self.pause_step_secs < 0.0 {
            return Err(ScanError::Configuration(
                "pause intervals must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_time(name: &str, value: &str) -> Result<NaiveTime, ScanError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ScanError::Configuration(format!("{} must be HH:MM, got {:?}", name, value)))
}

/// Symbols must be non-empty uppercase ASCII tickers. Checked once at
/// entry so a bad batch fails before any external call.
pub fn validate_symbols(symbols: &[String]) -> Result<(), ScanError> {
    for symbol in symbols {
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ScanError::Configuration(format!(
                "invalid symbol {:?}: expected uppercase ASCII letters",
                symbol
            )));
        }
    }
    Ok(())
}
