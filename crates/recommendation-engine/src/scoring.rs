//! Rule-based scoring: four sub-scores blended by fixed weights into one
//! confidence value, plus the derived classification, target price,
//! rationale, and time horizon.
//!
//! Every rule fires only when its metric is present; an absent metric skips
//! the rule rather than counting as zero. A present zero is a real value
//! and does fire its rules.

use advisor_core::{
    FundamentalMetrics, InvestmentGoal, RecommendationType, RiskTolerance, TimeHorizon,
};

/// Weights applied to the four sub-scores. They sum to 1.0 in the default
/// configuration, which keeps the composite inside [0, 1] before clamping.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub fundamental: f64,
    pub technical: f64,
    pub sentiment: f64,
    pub risk_alignment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fundamental: 0.4,
            technical: 0.3,
            sentiment: 0.15,
            risk_alignment: 0.15,
        }
    }
}

// Fundamental benchmarks.
const PE_UNDERVALUED: f64 = 15.0;
const PE_FAIR: f64 = 25.0;
const PE_OVERVALUED: f64 = 35.0;

const DEBT_EQUITY_LOW: f64 = 0.5;
const DEBT_EQUITY_HIGH: f64 = 2.0;

const ROE_POOR: f64 = 5.0;
const ROE_FAIR: f64 = 15.0;
const ROE_GOOD: f64 = 25.0;

fn clamp01(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Some providers report debt/equity as a percentage (e.g. 150 instead of
/// 1.5). Anything above 10 is assumed to be one. The boundary is arbitrary
/// but load-bearing: changing it silently reclassifies stocks.
fn normalize_debt_to_equity(raw: f64) -> f64 {
    if raw > 10.0 {
        raw / 100.0
    } else {
        raw
    }
}

/// Fundamental sub-score in [0, 1]: base 0.5 plus fixed adjustments per
/// present ratio, clamped.
pub fn fundamental_score(metrics: &FundamentalMetrics) -> f64 {
    let mut score = 0.5;

    if let Some(pe) = metrics.pe_ratio {
        if pe < PE_UNDERVALUED {
            score += 0.15;
        } else if pe < PE_FAIR {
            score += 0.10;
        } else if pe > PE_OVERVALUED {
            score -= 0.10;
        }
    }

    if let Some(de) = metrics.debt_to_equity {
        let de = normalize_debt_to_equity(de);
        if de < DEBT_EQUITY_LOW {
            score += 0.10;
        } else if de > DEBT_EQUITY_HIGH {
            score -= 0.10;
        }
    }

    if let Some(roe) = metrics.roe {
        if roe > ROE_GOOD {
            score += 0.15;
        } else if roe > ROE_FAIR {
            score += 0.10;
        } else if roe < ROE_POOR {
            score -= 0.10;
        }
    }

    if let Some(growth) = metrics.revenue_growth {
        if growth > 20.0 {
            score += 0.10;
        } else if growth > 10.0 {
            score += 0.05;
        } else if growth < 0.0 {
            score -= 0.10;
        }
    }

    if let Some(growth) = metrics.earnings_growth {
        if growth > 25.0 {
            score += 0.10;
        } else if growth > 10.0 {
            score += 0.05;
        } else if growth < 0.0 {
            score -= 0.10;
        }
    }

    clamp01(score)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_stddev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Technical sub-score in [0, 1] over a series of daily closes, oldest
/// first. Fewer than 20 closes is a known-neutral case: exactly 0.5.
pub fn technical_score(closes: &[f64]) -> f64 {
    if closes.len() < 20 {
        return 0.5;
    }

    let current_price = closes[closes.len() - 1];
    let ma_20 = mean(&closes[closes.len() - 20..]);
    let ma_50 = if closes.len() >= 50 {
        mean(&closes[closes.len() - 50..])
    } else {
        ma_20
    };

    let mut score = 0.5;

    if current_price > ma_20 {
        score += 0.15;
    } else {
        score -= 0.10;
    }

    if ma_20 > ma_50 {
        score += 0.10;
    } else {
        score -= 0.05;
    }

    // 10-day momentum.
    let base = closes[closes.len() - 10];
    let momentum = (current_price - base) / base;
    if momentum > 0.05 {
        score += 0.15;
    } else if momentum > 0.0 {
        score += 0.05;
    } else if momentum < -0.05 {
        score -= 0.15;
    }

    // 20-day volatility as a fraction of the mean.
    let window = &closes[closes.len() - 20..];
    let volatility = population_stddev(window) / mean(window);
    if volatility < 0.02 {
        score += 0.10;
    } else if volatility > 0.05 {
        score -= 0.10;
    }

    clamp01(score)
}

/// Sentiment sub-score. No live sentiment source is integrated; this is a
/// deliberate neutral stub whose weight slot must be preserved so composite
/// confidence stays reproducible.
pub fn sentiment_score() -> f64 {
    0.5
}

/// Assess a stock's own risk tier from its fundamentals.
pub fn assess_risk_level(metrics: &FundamentalMetrics) -> RiskTolerance {
    let mut risk_score = 0;

    if let Some(de) = metrics.debt_to_equity {
        let de = normalize_debt_to_equity(de);
        if de > 2.0 {
            risk_score += 2;
        } else if de > 1.0 {
            risk_score += 1;
        }
    }

    if let Some(pe) = metrics.pe_ratio {
        if pe > 40.0 {
            risk_score += 2;
        } else if pe > 25.0 {
            risk_score += 1;
        }
    }

    if matches!(metrics.earnings_growth, Some(g) if g < 0.0) {
        risk_score += 1;
    }

    if risk_score >= 3 {
        RiskTolerance::Aggressive
    } else if risk_score >= 1 {
        RiskTolerance::Moderate
    } else {
        RiskTolerance::Conservative
    }
}

/// How well the stock's assessed tier matches the user's tolerance:
/// same tier 1.0, adjacent tiers 0.7, opposite extremes 0.3.
pub fn risk_alignment(metrics: &FundamentalMetrics, user_risk: RiskTolerance) -> f64 {
    let stock_risk = assess_risk_level(metrics);
    match (user_risk, stock_risk) {
        (user, stock) if user == stock => 1.0,
        (RiskTolerance::Conservative, RiskTolerance::Aggressive)
        | (RiskTolerance::Aggressive, RiskTolerance::Conservative) => 0.3,
        _ => 0.7,
    }
}

/// Weighted composite of the four sub-scores, clamped to [0, 1].
pub fn composite_confidence(
    fundamental: f64,
    technical: f64,
    sentiment: f64,
    risk_alignment: f64,
    weights: &ScoringWeights,
) -> f64 {
    clamp01(
        fundamental * weights.fundamental
            + technical * weights.technical
            + sentiment * weights.sentiment
            + risk_alignment * weights.risk_alignment,
    )
}

/// Map confidence to a recommendation class. Total over [0, 1] and
/// monotonic: higher confidence never yields a less favorable class.
pub fn classify(confidence: f64) -> RecommendationType {
    if confidence >= 0.85 {
        RecommendationType::StrongBuy
    } else if confidence >= 0.70 {
        RecommendationType::Buy
    } else if confidence >= 0.45 {
        RecommendationType::Hold
    } else if confidence >= 0.30 {
        RecommendationType::Sell
    } else {
        RecommendationType::StrongSell
    }
}

/// Target price: a class-specific multiplier interpolated linearly by how
/// far confidence sits inside its bracket, clamped to [0.5x, 2.0x].
pub fn target_price(
    current_price: f64,
    confidence: f64,
    recommendation_type: RecommendationType,
) -> f64 {
    let multiplier = match recommendation_type {
        RecommendationType::StrongBuy => 1.15 + (confidence - 0.85) * 0.5,
        RecommendationType::Buy => 1.10 + (confidence - 0.70) * 0.33,
        RecommendationType::Hold => 1.0 + (confidence - 0.45) * 0.2,
        RecommendationType::Sell => 0.95 - (0.45 - confidence) * 0.33,
        RecommendationType::StrongSell => 0.85 - (0.30 - confidence) * 0.5,
    };

    current_price * multiplier.clamp(0.5, 2.0)
}

/// Deterministic human-readable rationale: matched metric phrases joined
/// behind an action prefix chosen by recommendation class.
pub fn rationale(
    symbol: &str,
    recommendation_type: RecommendationType,
    metrics: &FundamentalMetrics,
) -> String {
    let mut reasons: Vec<&'static str> = Vec::new();

    if let Some(pe) = metrics.pe_ratio {
        if pe < 15.0 {
            reasons.push("attractively valued with low P/E ratio");
        } else if pe > 35.0 {
            reasons.push("premium valuation may limit upside");
        }
    }

    if let Some(roe) = metrics.roe {
        if roe > 25.0 {
            reasons.push("strong return on equity indicates efficient management");
        } else if roe < 5.0 {
            reasons.push("low ROE suggests operational challenges");
        }
    }

    if let Some(growth) = metrics.revenue_growth {
        if growth > 20.0 {
            reasons.push("impressive revenue growth trajectory");
        } else if growth < 0.0 {
            reasons.push("declining revenue is a concern");
        }
    }

    if let Some(de) = metrics.debt_to_equity {
        let de = normalize_debt_to_equity(de);
        if de < 0.5 {
            reasons.push("healthy balance sheet with low debt");
        } else if de > 2.0 {
            reasons.push("high debt levels increase risk");
        }
    }

    if reasons.is_empty() {
        reasons.push("balanced fundamentals align with market expectations");
    }

    let action = match recommendation_type {
        RecommendationType::StrongBuy => "Strongly recommend buying",
        RecommendationType::Buy => "Recommend buying",
        RecommendationType::Hold => "Recommend holding",
        RecommendationType::Sell => "Recommend selling",
        RecommendationType::StrongSell => "Strongly recommend selling",
    };

    format!("{} {}. Analysis shows {}.", action, symbol, reasons.join(", "))
}

/// Time horizon: the investment goal dominates, then the recommendation
/// class decides between medium and short term.
pub fn time_horizon(goal: InvestmentGoal, recommendation_type: RecommendationType) -> TimeHorizon {
    match goal {
        InvestmentGoal::Speculation => TimeHorizon::ShortTerm,
        InvestmentGoal::Growth => TimeHorizon::LongTerm,
        _ => match recommendation_type {
            RecommendationType::StrongBuy | RecommendationType::Buy => TimeHorizon::MediumTerm,
            _ => TimeHorizon::ShortTerm,
        },
    }
}
