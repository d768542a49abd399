use scanner_core::{AtmRiskLevel, ConfidenceLevel};

pub const CRITICAL_BURN_RATE: f64 = 3.0;
pub const WARNING_BURN_RATE: f64 = 6.0;
pub const HIGH_CASH_RATIO: f64 = 1.5;
pub const MEDIUM_CASH_RATIO: f64 = 0.75;
pub const LOW_CASH_RATIO: f64 = 0.25;
pub const SMALL_CASH: f64 = 10_000_000.0;
pub const MICRO_CASH: f64 = 5_000_000.0;

/// Trading stances in ascending severity. The cascade may only move a
/// stance upward; a later weaker rule never loosens a stricter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TradingStance {
    HoldAccumulate,
    HoldInsufficientData,
    HoldWithCaution,
    CautionShortTerm,
    CautionReduce,
    SellShortTermOnly,
    ReduceAvoid,
    AvoidSell,
}

impl TradingStance {
    pub fn label(&self) -> &'static str {
        match self {
            TradingStance::HoldAccumulate => "Hold/Accumulate",
            TradingStance::HoldInsufficientData => {
                "Hold - insufficient data to make recommendation"
            }
            TradingStance::HoldWithCaution => "Hold with caution",
            TradingStance::CautionShortTerm => "Caution/Short-term",
            TradingStance::CautionReduce => "Caution/Reduce",
            TradingStance::SellShortTermOnly => "Sell/Short-term only",
            TradingStance::ReduceAvoid => "Reduce/Avoid",
            TradingStance::AvoidSell => "Avoid/Sell",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CascadeInput {
    pub risk_level: AtmRiskLevel,
    pub risk_reason: String,
    pub cash: Option<f64>,
    pub cash_ratio: Option<f64>,
    pub burn_rate_months: Option<f64>,
    pub has_valid_shelf: bool,
}

#[derive(Debug, Clone)]
pub struct TradingRecommendation {
    pub stance: TradingStance,
    pub confidence: ConfidenceLevel,
    pub reasons: Vec<String>,
    pub strategy: String,
    pub short_squeeze_risk: String,
}

impl TradingRecommendation {
    fn escalate(&mut self, stance: TradingStance) {
        if stance > self.stance {
            self.stance = stance;
        }
    }
}

/// Build the trading recommendation for a classified symbol. The risk
/// level sets the baseline stance and confidence; subsequent checks
/// append reasons in a fixed order and may only escalate the stance.
pub fn recommend(input: &CascadeInput) -> TradingRecommendation {
    let mut rec = TradingRecommendation {
        stance: TradingStance::HoldInsufficientData,
        confidence: ConfidenceLevel::Low,
        reasons: Vec::new(),
        strategy: "Monitor for more financial information".to_string(),
        short_squeeze_risk: String::new(),
    };

    match input.risk_level {
        AtmRiskLevel::None if input.cash.map_or(false, |c| c > SMALL_CASH) => {
            rec.stance = TradingStance::HoldAccumulate;
            rec.confidence = ConfidenceLevel::Medium;
            rec.reasons
                .push("No dilution risk with adequate cash reserves".to_string());
            rec.strategy = "Conservative position sizing with tight stops".to_string();
        }
        AtmRiskLevel::VeryHigh => {
            rec.stance = TradingStance::AvoidSell;
            rec.confidence = ConfidenceLevel::High;
            rec.reasons
                .push(format!("Very high ATM risk: {}", input.risk_reason));
            rec.strategy =
                "Exit positions or avoid entry until financial situation improves".to_string();
        }
        AtmRiskLevel::High => {
            rec.stance = TradingStance::SellShortTermOnly;
            rec.confidence = ConfidenceLevel::MediumHigh;
            rec.reasons
                .push(format!("High ATM risk: {}", input.risk_reason));
            rec.strategy =
                "Day trading only with strict risk management, avoid swing positions".to_string();
        }
        AtmRiskLevel::MediumHigh => {
            rec.stance = TradingStance::CautionShortTerm;
            rec.confidence = ConfidenceLevel::Medium;
            rec.reasons
                .push(format!("Medium-High ATM risk: {}", input.risk_reason));
            rec.strategy = "Reduced position size, quick profit taking, tight stops".to_string();
        }
        AtmRiskLevel::Medium => {
            rec.stance = TradingStance::HoldWithCaution;
            rec.confidence = ConfidenceLevel::Medium;
            rec.reasons.push("Moderate dilution risk".to_string());
            rec.strategy = "Normal position sizing with standard risk management".to_string();
        }
        AtmRiskLevel::None => {}
    }

    // Cash/debt ratio refinement. A strong ratio is recorded but no longer
    // relaxes the stance set above.
    if let Some(ratio) = input.cash_ratio {
        if ratio > HIGH_CASH_RATIO {
            rec.reasons.push(format!(
                "Strong cash position relative to debt ({:.1}%)",
                ratio * 100.0
            ));
        } else if ratio < LOW_CASH_RATIO {
            rec.reasons.push(format!(
                "Weak cash position relative to debt ({:.1}%)",
                ratio * 100.0
            ));
            rec.escalate(TradingStance::CautionReduce);
        }
    }

    // Burn rate refinement
    if let Some(burn) = input.burn_rate_months {
        if burn < CRITICAL_BURN_RATE {
            rec.reasons
                .push(format!("Critical burn rate of {:.1} months", burn));
            rec.escalate(TradingStance::ReduceAvoid);
        } else if burn < WARNING_BURN_RATE {
            rec.reasons
                .push(format!("Concerning burn rate of {:.1} months", burn));
            rec.escalate(TradingStance::CautionReduce);
        }
    }

    // Active shelf registration
    if input.has_valid_shelf {
        rec.reasons
            .push("Active shelf registration increases dilution possibility".to_string());
        if rec.stance < TradingStance::SellShortTermOnly {
            rec.strategy.push_str("; Be prepared for potential offerings");
        }
    }

    // Absolute cash reserves
    if let Some(cash) = input.cash {
        if cash < MICRO_CASH {
            rec.reasons.push(format!(
                "Extremely low cash reserves (${:.2}M)",
                cash / 1_000_000.0
            ));
            rec.escalate(TradingStance::AvoidSell);
        } else if cash < SMALL_CASH {
            rec.reasons
                .push(format!("Low cash reserves (${:.2}M)", cash / 1_000_000.0));
            rec.escalate(TradingStance::CautionReduce);
        }
    }

    rec.short_squeeze_risk = short_squeeze_risk(input);
    rec
}

fn short_squeeze_risk(input: &CascadeInput) -> String {
    let low_cash = input.cash.map_or(false, |c| c < SMALL_CASH);
    if low_cash && input.has_valid_shelf {
        if input.cash_ratio.map_or(false, |r| r > MEDIUM_CASH_RATIO) {
            "Moderate short squeeze risk despite active shelf".to_string()
        } else {
            "High short squeeze risk due to low cash and active shelf".to_string()
        }
    } else {
        "Low short squeeze risk".to_string()
    }
}
