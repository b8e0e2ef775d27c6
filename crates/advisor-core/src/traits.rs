use async_trait::async_trait;
use std::time::Duration;

use crate::{
    AdvisorError, Candle, Exchange, FundamentalMetrics, HistoryRange, StockQuote,
};

/// One upstream quote source. Providers are tried in priority order; a
/// provider that cannot serve a symbol returns `Ok(None)` or an error, and
/// the resolver falls through to the next one.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this provider can quote symbols on the given exchange at all.
    /// Unsupported exchanges are skipped without a network call.
    fn supports(&self, exchange: Exchange) -> bool {
        let _ = exchange;
        true
    }

    async fn fetch_quote(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<Option<StockQuote>, AdvisorError>;
}

#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<FundamentalMetrics, AdvisorError>;
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Ordered daily candles, oldest first.
    async fn fetch_history(
        &self,
        symbol: &str,
        exchange: Exchange,
        range: HistoryRange,
    ) -> Result<Vec<Candle>, AdvisorError>;
}

/// TTL key-value store shared by the quote resolver and the recommendation
/// cache. Values are JSON strings; concurrency control is the store's
/// problem, not the caller's.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Delete every key matching a glob-style pattern, `*` matching any run
    /// of characters (e.g. `recommendation:*:conservative`).
    async fn delete_pattern(&self, pattern: &str);
}
