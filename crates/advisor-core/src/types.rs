use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exchange::Exchange;

/// Real-time quote snapshot. Replaced wholesale on refresh, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub exchange: Exchange,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: i64,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub week_52_high: f64,
    pub week_52_low: f64,
    pub last_updated: DateTime<Utc>,
}

/// Daily OHLCV bar from the history provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Sparse fundamental ratios. `None` means the provider did not supply the
/// field; a present 0.0 is a real value and must stay distinct from `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub current_ratio: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub price_to_sales: Option<f64>,
}

/// Risk tier, used both as a user preference and as a stock's assessed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentGoal {
    Growth,
    Income,
    Preservation,
    Speculation,
}

/// Recommendation classes, ordered least to most favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl RecommendationType {
    pub fn to_label(&self) -> &'static str {
        match self {
            RecommendationType::StrongBuy => "Strong Buy",
            RecommendationType::Buy => "Buy",
            RecommendationType::Hold => "Hold",
            RecommendationType::Sell => "Sell",
            RecommendationType::StrongSell => "Strong Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

/// The slice of the user document the engine actually reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub risk_tolerance: RiskTolerance,
    pub investment_goal: InvestmentGoal,
    pub preferred_exchanges: Vec<Exchange>,
}

/// Completed analysis for one (symbol, exchange, analysis date).
/// Immutable once created; expires out of the cache by TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub stock_symbol: String,
    pub stock_name: String,
    pub exchange: Exchange,
    pub recommendation_type: RecommendationType,
    pub confidence_score: f64,
    pub current_price: f64,
    pub target_price: f64,
    pub potential_return: f64,
    pub rationale: String,
    pub risk_level: RiskTolerance,
    pub time_horizon: TimeHorizon,
    pub fundamental_metrics: FundamentalMetrics,
    pub created_at: DateTime<Utc>,
}

/// History window understood by the history provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl HistoryRange {
    /// Range token in the form the chart APIs accept.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRange::OneMonth => "1mo",
            HistoryRange::ThreeMonths => "3mo",
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
        }
    }
}
