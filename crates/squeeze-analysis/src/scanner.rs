use chrono::{Months, NaiveDate};
use scanner_core::{FloatRatioRisk, FloatRisk, MergedSymbolRecord, SqueezeAssessment};

const EXTREME_FLOAT: f64 = 1_000_000.0;
const HIGH_FLOAT: f64 = 5_000_000.0;
const FLOAT_RATIO_WARNING: f64 = 0.4;
const CASH_CRISIS_RATIO: f64 = 0.10;
const CROWDED_SHORT_RATIO: f64 = 0.3;
const RESISTANCE_DISTANCE: f64 = 0.03;
const SHELF_VALIDITY_YEARS: u32 = 3;

const WEIGHT_EXTREME_FLOAT: f64 = 0.5;
const WEIGHT_FLOAT_RATIO: f64 = 0.2;
const WEIGHT_SHORT_RISK: f64 = 0.2;
const WEIGHT_CASH_CRISIS: f64 = 0.1;

/// Signal thresholds for the composite short signal.
const MAX_SQUEEZE_SCORE: f64 = 0.4;
const MIN_HYPE_SCORE: i64 = 3;

const HYPE_KEYWORDS: [&str; 5] = ["breakthrough", "surge", "milestone", "bullish", "buy rating"];

/// Computes the composite short-squeeze risk score and short-sale signal
/// for one merged per-symbol record. Missing inputs drop their indicator
/// (weights renormalize) or evaluate the dependent clause to false; the
/// scorer itself never fails.
pub struct SqueezeScanner;

impl SqueezeScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(
        &self,
        record: &MergedSymbolRecord,
        current_price: Option<f64>,
        intraday_high: Option<f64>,
        short_interest: Option<f64>,
        today: NaiveDate,
    ) -> SqueezeAssessment {
        let float_risk = record.float.map(|float| {
            if float < EXTREME_FLOAT {
                FloatRisk::Extreme
            } else if float < HIGH_FLOAT {
                FloatRisk::High
            } else {
                FloatRisk::Acceptable
            }
        });

        let float_ratio = match (record.float, record.outstanding_shares) {
            (Some(float), Some(outstanding)) if outstanding > 0.0 => Some(float / outstanding),
            _ => None,
        };
        let float_ratio_risk = float_ratio.map(|ratio| {
            if ratio < FLOAT_RATIO_WARNING {
                FloatRatioRisk::Warning
            } else {
                FloatRatioRisk::Normal
            }
        });

        let market_cap = match (record.outstanding_shares, current_price) {
            (Some(outstanding), Some(price)) => Some(outstanding * price),
            _ => None,
        };
        let cash_to_market_cap = match (record.cash_usd, market_cap) {
            (Some(cash), Some(mcap)) if mcap > 0.0 => Some(cash / mcap),
            _ => None,
        };
        let cash_crisis = cash_to_market_cap.map(|ratio| (ratio < CASH_CRISIS_RATIO) as i64);

        let short_ratio = match (short_interest, record.float) {
            (Some(short), Some(float)) if float > 0.0 => Some(short / float),
            _ => None,
        };

        let squeeze_score = Self::composite_score(
            float_risk,
            float_ratio_risk,
            short_ratio,
            cash_crisis,
        );

        let atm_urgency = Self::atm_urgency(record.burn_rate_months, record.last_shelf_date, today);

        let resistance_ok = match (intraday_high, current_price) {
            (Some(high), Some(price)) if high > 0.0 => {
                (high - price) / high < RESISTANCE_DISTANCE
            }
            _ => false,
        };

        let hype_score = Self::hype_score(record.suggestion.as_deref());

        let short_signal = squeeze_score < MAX_SQUEEZE_SCORE
            && atm_urgency == 1
            && resistance_ok
            && hype_score >= MIN_HYPE_SCORE;
        tracing::debug!(
            symbol = %record.symbol,
            squeeze_score,
            atm_urgency,
            resistance_ok,
            hype_score,
            short_signal,
            "squeeze assessment"
        );

        SqueezeAssessment {
            symbol: record.symbol.clone(),
            float_risk,
            float_ratio,
            float_ratio_risk,
            market_cap,
            cash_to_market_cap,
            cash_crisis,
            short_ratio,
            squeeze_score,
            atm_urgency,
            resistance_ok,
            hype_score,
            short_signal,
        }
    }

    /// Weighted sum of the computable indicators. Weights of indicators
    /// whose source data is missing are dropped and the rest renormalized
    /// to 1.0; the short-risk indicator is the exception and always
    /// participates, scoring 0 when short interest is unavailable.
    fn composite_score(
        float_risk: Option<FloatRisk>,
        float_ratio_risk: Option<FloatRatioRisk>,
        short_ratio: Option<f64>,
        cash_crisis: Option<i64>,
    ) -> f64 {
        let mut components: Vec<(f64, f64)> = Vec::with_capacity(4);

        if let Some(risk) = float_risk {
            let value = (risk == FloatRisk::Extreme) as i64 as f64;
            components.push((value, WEIGHT_EXTREME_FLOAT));
        }
        if let Some(risk) = float_ratio_risk {
            let value = (risk == FloatRatioRisk::Warning) as i64 as f64;
            components.push((value, WEIGHT_FLOAT_RATIO));
        }

        let short_risk = match short_ratio {
            Some(ratio) if ratio > CROWDED_SHORT_RATIO => 1.0,
            _ => 0.0,
        };
        components.push((short_risk, WEIGHT_SHORT_RISK));

        if let Some(crisis) = cash_crisis {
            components.push((crisis as f64, WEIGHT_CASH_CRISIS));
        }

        let total_weight: f64 = components.iter().map(|(_, w)| w).sum();
        components
            .iter()
            .map(|(value, weight)| value * (weight / total_weight))
            .sum()
    }

    /// ATM offering urgency: 1 when the cash runway is shorter than the
    /// months remaining before the shelf registration's 3-year validity
    /// window closes. Requires both a burn rate and a shelf date.
    fn atm_urgency(
        burn_rate_months: Option<f64>,
        last_shelf_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> i64 {
        let (burn, shelf) = match (burn_rate_months, last_shelf_date) {
            (Some(burn), Some(shelf)) => (burn, shelf),
            _ => return 0,
        };

        let expiry = match shelf.checked_add_months(Months::new(SHELF_VALIDITY_YEARS * 12)) {
            Some(date) => date,
            None => return 0,
        };
        let months_left = (expiry - today).num_days() as f64 / 30.0;
        (burn < months_left) as i64
    }

    /// Count of case-sensitive keyword occurrences in the suggestion text.
    fn hype_score(suggestion: Option<&str>) -> i64 {
        let text = match suggestion {
            Some(text) => text,
            None => return 0,
        };
        HYPE_KEYWORDS
            .iter()
            .map(|keyword| text.matches(keyword).count() as i64)
            .sum()
    }
}

impl Default for SqueezeScanner {
    fn default() -> Self {
        Self::new()
    }
}
