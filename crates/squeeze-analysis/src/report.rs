use scanner_core::{FloatRatioRisk, MergedSymbolRecord, SqueezeAssessment};
use std::fmt::Write;

/// Human-readable multi-section analysis report for one assessed symbol.
pub fn render_report(record: &MergedSymbolRecord, assessment: &SqueezeAssessment) -> String {
    let mut out = String::new();
    let name = record.name.as_deref().unwrap_or("N/A");

    let _ = writeln!(out, "[Stock Analysis Report] {} - {}", assessment.symbol, name);
    let _ = writeln!(out, "{}", "=".repeat(50));

    let _ = writeln!(out, "\n[Liquidity Analysis]");
    if let Some(float) = record.float {
        let _ = writeln!(out, "- Float: {:.0} shares", float);
    }
    if let Some(ratio) = assessment.float_ratio {
        let _ = writeln!(
            out,
            "- Float Ratio: {:.1}% (of total outstanding shares)",
            ratio * 100.0
        );
    }
    if let Some(risk) = assessment.float_risk {
        let _ = writeln!(out, "- Risk Assessment: {:?}", risk);
    }
    if assessment.float_ratio_risk == Some(FloatRatioRisk::Warning) {
        let _ = writeln!(
            out,
            "  Warning: float ratio below 40%, may be susceptible to major shareholder manipulation"
        );
    }

    if let Some(ratio) = assessment.cash_to_market_cap {
        let _ = writeln!(out, "\n[Financial Health]");
        let verdict = if ratio < 0.1 {
            "(Insufficient cash reserves)"
        } else {
            "(Adequate cash reserves)"
        };
        let _ = writeln!(out, "- Cash/Market Cap Ratio: {:.1}% {}", ratio * 100.0, verdict);
    }

    let _ = writeln!(out, "\n[Short Squeeze Risk Assessment]");
    let _ = writeln!(
        out,
        "- Composite Squeeze Risk Score: {:.0}/100",
        assessment.squeeze_score * 100.0
    );
    let verdict = if assessment.squeeze_score > 0.7 {
        "High Risk: this stock has high short squeeze potential"
    } else if assessment.squeeze_score > 0.4 {
        "Medium Risk: monitor short squeeze potential"
    } else {
        "Low Risk: short squeeze potential is low"
    };
    let _ = writeln!(out, "  {}", verdict);

    let _ = writeln!(out, "\n[Short Opportunity Assessment]");
    if assessment.short_signal {
        let _ = writeln!(out, "  Strong short signal: satisfies the following conditions:");
        let mut reasons = Vec::new();
        if assessment.squeeze_score < 0.4 {
            reasons.push("Low short squeeze risk");
        }
        if assessment.atm_urgency == 1 {
            reasons.push("Potential imminent stock offering");
        }
        if assessment.resistance_ok {
            reasons.push("Price near resistance level");
        }
        if assessment.hype_score >= 3 {
            reasons.push("Excessive market optimism");
        }
        for reason in reasons {
            let _ = writeln!(out, "    - {}", reason);
        }
    } else {
        let _ = writeln!(out, "  No clear short signal");
    }

    let _ = writeln!(out, "\n[Market Sentiment]");
    let _ = writeln!(out, "- News Hype Score: {}", assessment.hype_score);
    if assessment.hype_score >= 3 {
        let _ = writeln!(out, "  Market sentiment is elevated, be cautious of excessive optimism");
    }

    let _ = writeln!(out, "\n[Overall Recommendation]");
    let overall = if assessment.short_signal {
        "Consider short opportunity, but set strict stop losses"
    } else if assessment.squeeze_score > 0.6 {
        "Trade with caution, this stock has short squeeze risk"
    } else {
        "Neutral outlook, no clear trading signal"
    };
    let _ = writeln!(out, "  {}", overall);
    let _ = writeln!(out, "{}", "=".repeat(50));

    out
}
