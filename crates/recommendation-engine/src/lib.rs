use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use advisor_core::{
    CacheStore, Exchange, HistoryRange, InvestmentGoal, Recommendation, RiskTolerance, UserProfile,
};
use market_data::MarketDataService;

pub mod config;
pub mod scoring;
pub mod universe;


pub use config::EngineConfig;
pub use scoring::ScoringWeights;

/// Heuristic recommendation engine: fans analysis out across a candidate
/// universe, scores each stock against the user's risk profile, and returns
/// the ranked survivors. One bad symbol never takes down a batch.
pub struct RecommendationEngine {
    market_data: Arc<MarketDataService>,
    cache: Arc<dyn CacheStore>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        market_data: Arc<MarketDataService>,
        cache: Arc<dyn CacheStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            market_data,
            cache,
            config,
        }
    }

    /// Generate ranked recommendations for a user.
    ///
    /// Explicit `symbols`/`exchanges` narrow the candidate set; otherwise
    /// the user's preferred exchanges and the curated universe apply. Pairs
    /// are analyzed concurrently under a bounded permit pool; per-pair
    /// failures are logged and skipped. Output is filtered by the
    /// confidence threshold, sorted descending by confidence (stable, so
    /// ties keep candidate order), and truncated to `max_recommendations`.
    pub async fn generate_recommendations(
        self: &Arc<Self>,
        profile: &UserProfile,
        symbols: Option<Vec<String>>,
        exchanges: Option<Vec<Exchange>>,
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        let exchanges = exchanges.unwrap_or_else(|| profile.preferred_exchanges.clone());
        let symbols = symbols.unwrap_or_else(|| universe::candidate_symbols(&exchanges));

        tracing::info!(
            "generating recommendations: {} symbols x {} exchanges, risk {}",
            symbols.len(),
            exchanges.len(),
            profile.risk_tolerance
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_analyses));
        let mut tasks = JoinSet::new();

        let mut order = 0usize;
        for symbol in &symbols {
            for exchange in &exchanges {
                let engine = Arc::clone(self);
                let semaphore = Arc::clone(&semaphore);
                let symbol = symbol.clone();
                let exchange = *exchange;
                let risk = profile.risk_tolerance;
                let goal = profile.investment_goal;
                let index = order;
                order += 1;

                tasks.spawn(async move {
                    // Closed only when the engine is dropped mid-batch.
                    let Ok(_permit) = semaphore.acquire().await else {
                        return (index, None);
                    };
                    let result = engine.analyze_stock(&symbol, exchange, risk, goal).await;
                    if result.is_none() {
                        tracing::warn!("skipping {}:{}: no analyzable data", symbol, exchange);
                    }
                    (index, result)
                });
            }
        }

        let mut scored: Vec<(usize, Recommendation)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(recommendation))) => {
                    if recommendation.confidence_score >= self.config.confidence_threshold {
                        scored.push((index, recommendation));
                    }
                }
                Ok((_, None)) => {}
                Err(e) => tracing::error!("analysis task panicked: {}", e),
            }
        }

        // Restore candidate order first so that the stable sort breaks
        // confidence ties by original encounter order.
        scored.sort_by_key(|(index, _)| *index);
        let mut recommendations: Vec<Recommendation> =
            scored.into_iter().map(|(_, rec)| rec).collect();
        recommendations.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations.truncate(max_recommendations);

        tracing::info!("returning {} recommendations", recommendations.len());
        recommendations
    }

    /// Recommendation for one specific stock, held to the same confidence
    /// threshold as batch output: below it there is nothing to recommend.
    /// `None` when no provider can quote the symbol or confidence falls
    /// short.
    pub async fn get_single_recommendation(
        &self,
        symbol: &str,
        exchange: Exchange,
        profile: &UserProfile,
    ) -> Option<Recommendation> {
        self.analyze_stock(symbol, exchange, profile.risk_tolerance, profile.investment_goal)
            .await
            .filter(|rec| rec.confidence_score >= self.config.confidence_threshold)
    }

    /// Force-refresh for one user's risk tier: invalidate that tier's
    /// cached recommendations, then recompute (repopulating the cache).
    pub async fn refresh(
        self: &Arc<Self>,
        profile: &UserProfile,
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        let pattern = format!("recommendation:*:{}", profile.risk_tolerance);
        self.cache.delete_pattern(&pattern).await;
        self.generate_recommendations(profile, None, None, max_recommendations)
            .await
    }

    /// Full single-stock analysis: resolve quote, fetch fundamentals and
    /// history, score, and cache. `None` means "cannot analyze right now"
    /// (no quote from any provider), never an error.
    async fn analyze_stock(
        &self,
        symbol: &str,
        exchange: Exchange,
        risk_tolerance: RiskTolerance,
        investment_goal: InvestmentGoal,
    ) -> Option<Recommendation> {
        let cache_key = format!("recommendation:{}:{}:{}", symbol, exchange, risk_tolerance);
        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str(&cached) {
                Ok(recommendation) => return Some(recommendation),
                Err(e) => {
                    tracing::warn!("discarding malformed cached recommendation {}: {}", cache_key, e)
                }
            }
        }

        let quote = self.market_data.get_quote(symbol, exchange).await?;
        let metrics = self.market_data.get_fundamentals(symbol, exchange).await;
        let history = self
            .market_data
            .get_price_history(symbol, exchange, HistoryRange::ThreeMonths)
            .await;
        let closes: Vec<f64> = history.iter().map(|c| c.close).collect();

        let fundamental = scoring::fundamental_score(&metrics);
        let technical = scoring::technical_score(&closes);
        let sentiment = scoring::sentiment_score();
        let alignment = scoring::risk_alignment(&metrics, risk_tolerance);

        let confidence = scoring::composite_confidence(
            fundamental,
            technical,
            sentiment,
            alignment,
            &self.config.weights,
        );
        let recommendation_type = scoring::classify(confidence);
        let target = scoring::target_price(quote.current_price, confidence, recommendation_type);
        let potential_return = (target - quote.current_price) / quote.current_price * 100.0;

        let created_at = Utc::now();
        let recommendation = Recommendation {
            id: format!("{}_{}_{}", symbol, exchange, created_at.format("%Y%m%d")),
            stock_symbol: symbol.to_string(),
            stock_name: quote.name.clone(),
            exchange,
            recommendation_type,
            confidence_score: scoring::round2(confidence),
            current_price: quote.current_price,
            target_price: scoring::round2(target),
            potential_return: scoring::round2(potential_return),
            rationale: scoring::rationale(symbol, recommendation_type, &metrics),
            risk_level: scoring::assess_risk_level(&metrics),
            time_horizon: scoring::time_horizon(investment_goal, recommendation_type),
            fundamental_metrics: metrics,
            created_at,
        };

        match serde_json::to_string(&recommendation) {
            Ok(json) => {
                self.cache
                    .set(&cache_key, json, self.config.recommendation_ttl)
                    .await;
            }
            Err(e) => tracing::warn!("failed to cache recommendation {}: {}", cache_key, e),
        }

        Some(recommendation)
    }
}
