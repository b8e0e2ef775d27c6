use std::time::Duration;

use crate::scoring::ScoringWeights;

/// Engine tuning, read from the environment with production defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Recommendations below this confidence are dropped from batch output.
    pub confidence_threshold: f64,
    /// How long a completed recommendation stays cached.
    pub recommendation_ttl: Duration,
    /// Upper bound on simultaneous per-symbol analyses.
    pub max_concurrent_analyses: usize,
    pub weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            recommendation_ttl: Duration::from_secs(3600),
            max_concurrent_analyses: 10,
            weights: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            confidence_threshold: std::env::var("RECOMMENDATION_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.confidence_threshold),
            recommendation_ttl: Duration::from_secs(
                std::env::var("RECOMMENDATION_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3600),
            ),
            max_concurrent_analyses: std::env::var("MAX_CONCURRENT_API_CALLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_analyses),
            weights: defaults.weights,
        }
    }
}
