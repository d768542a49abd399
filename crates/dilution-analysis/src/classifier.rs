use chrono::{Months, NaiveDate};
use scanner_core::{AtmRiskLevel, CashBenchmark, DilutionAssessment, Filing, FinancialFacts};
use tracing::debug;

use crate::recommendation::{recommend, CascadeInput, WARNING_BURN_RATE};

/// Form types that register securities for future at-the-market sale.
pub const SHELF_FORMS: [&str; 5] = ["S-3", "S-3/A", "S-3ASR", "F-3", "F-3ASR"];

/// A shelf registration stays usable for three years after filing.
pub const SHELF_VALIDITY_YEARS: u32 = 3;

pub const INDUSTRY_MEDIAN_CASH: f64 = 50_000_000.0;

const MICRO_CASH: f64 = 5_000_000.0;
const SMALL_CASH: f64 = 10_000_000.0;
const CRITICAL_CASH_RATIO: f64 = 0.1;
const LOW_CASH_RATIO: f64 = 0.25;

/// Alternate names issuers report each metric under, in preference order.
const CASH_METRICS: [&str; 2] = [
    "CashAndCashEquivalentsAtCarryingValue",
    "CashCashEquivalentsAndShortTermInvestments",
];
const DEBT_METRICS: [&str; 2] = ["LongTermDebt", "LongTermDebtAndCapitalLeaseObligation"];
const OCF_METRICS: [&str; 1] = ["NetCashProvidedByUsedInOperatingActivities"];

/// Latest reported value for the first metric name that has any data.
/// Later names are fallbacks, never merged with an earlier hit.
pub fn extract_metric(facts: &FinancialFacts, names: &[&str]) -> Option<f64> {
    for name in names {
        if let Some(series) = facts.series(name) {
            if let Some(latest) = series.iter().max_by_key(|e| e.end) {
                return Some(latest.val);
            }
        }
    }
    None
}

/// Classifies a symbol's dilution risk from its shelf filings and
/// reported financials, then derives a trading recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DilutionClassifier;

impl DilutionClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(
        &self,
        symbol: &str,
        cik: Option<&str>,
        filings: &[Filing],
        facts: &FinancialFacts,
        today: NaiveDate,
    ) -> DilutionAssessment {
        let shelf: Vec<&Filing> = filings
            .iter()
            .filter(|f| SHELF_FORMS.contains(&f.form.as_str()))
            .collect();
        let cutoff = today
            .checked_sub_months(Months::new(SHELF_VALIDITY_YEARS * 12))
            .unwrap_or(today);
        let valid: Vec<&&Filing> = shelf.iter().filter(|f| f.date > cutoff).collect();
        let last_shelf_date = valid.iter().map(|f| f.date).max();
        let has_valid_shelf = !valid.is_empty();

        let cash = extract_metric(facts, &CASH_METRICS);
        let debt = extract_metric(facts, &DEBT_METRICS);
        let ocf = extract_metric(facts, &OCF_METRICS);

        let cash_debt_ratio = match (cash, debt) {
            (Some(c), Some(d)) if d > 0.0 => Some(c / d),
            _ => None,
        };

        // Quarterly operating cash flow; burn only makes sense while the
        // company loses cash from operations.
        let burn_rate_months = match (cash, ocf) {
            (Some(c), Some(o)) if o < 0.0 => Some(c / o.abs() * 3.0),
            _ => None,
        };

        let (atm_risk_level, risk_reason) = risk_level(
            has_valid_shelf,
            cash,
            cash_debt_ratio,
            burn_rate_months,
        );
        debug!(
            symbol,
            risk = atm_risk_level.label(),
            reason = %risk_reason,
            "classified dilution risk"
        );

        let industry_cash_benchmark = if cash.map_or(false, |c| c >= INDUSTRY_MEDIAN_CASH) {
            CashBenchmark::Above
        } else {
            CashBenchmark::Below
        };

        let rec = recommend(&CascadeInput {
            risk_level: atm_risk_level,
            risk_reason: risk_reason.clone(),
            cash,
            cash_ratio: cash_debt_ratio,
            burn_rate_months,
            has_valid_shelf,
        });

        DilutionAssessment {
            symbol: symbol.to_string(),
            cik: cik.map(|c| c.to_string()),
            cash,
            debt,
            cash_debt_ratio,
            burn_rate_months,
            total_shelf_filings: shelf.len(),
            valid_shelf_filings: valid.len(),
            last_shelf_date,
            atm_risk_level,
            risk_reason,
            industry_cash_benchmark,
            trading_recommendation: rec.stance.label().to_string(),
            confidence: rec.confidence,
            reasons: rec.reasons,
            strategy: rec.strategy,
            short_squeeze_risk: rec.short_squeeze_risk,
            data_date: today,
        }
    }
}

/// Decision table for the ATM risk level. Rows are checked top to bottom;
/// a missing cash/debt ratio counts as zero so thin balance sheets fall
/// through to the stricter rows rather than the adequate one.
fn risk_level(
    has_valid_shelf: bool,
    cash: Option<f64>,
    cash_debt_ratio: Option<f64>,
    burn_rate_months: Option<f64>,
) -> (AtmRiskLevel, String) {
    if !has_valid_shelf {
        return (
            AtmRiskLevel::None,
            "No active shelf registration".to_string(),
        );
    }

    let cash = match cash {
        Some(c) => c,
        None => return (AtmRiskLevel::VeryHigh, "No cash reported".to_string()),
    };
    if cash < MICRO_CASH {
        return (AtmRiskLevel::VeryHigh, "Cash < $5M".to_string());
    }
    if cash < SMALL_CASH {
        return (AtmRiskLevel::High, "$5M <= Cash < $10M".to_string());
    }

    let ratio = cash_debt_ratio.unwrap_or(0.0);
    if ratio < CRITICAL_CASH_RATIO {
        return (
            AtmRiskLevel::High,
            format!("Cash/Debt ratio < 10% ({:.1}%)", ratio * 100.0),
        );
    }
    if ratio < LOW_CASH_RATIO {
        return (
            AtmRiskLevel::MediumHigh,
            format!("10% <= Cash/Debt ratio < 25% ({:.1}%)", ratio * 100.0),
        );
    }

    if let Some(burn) = burn_rate_months {
        if burn < WARNING_BURN_RATE {
            return (
                AtmRiskLevel::MediumHigh,
                format!("Burn rate < 6 months ({:.1} months)", burn),
            );
        }
    }

    (AtmRiskLevel::Medium, "Adequate liquidity".to_string())
}
