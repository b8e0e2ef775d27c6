use std::sync::Arc;
use std::time::Duration;

use advisor_core::{
    Candle, CacheStore, Exchange, FundamentalMetrics, FundamentalsProvider, HistoryProvider,
    HistoryRange, QuoteProvider, StockQuote,
};

pub mod config;
pub mod providers;

pub use config::MarketDataConfig;
pub use providers::{AlphaVantageProvider, IexProvider, YahooProvider};

/// Resolves quotes, fundamentals, and price history for the engine.
///
/// Quote resolution walks a ranked provider chain and memoizes the first
/// usable result under a short TTL. Fundamentals and history fail open: any
/// provider trouble degrades to empty data instead of an error, so one bad
/// upstream never takes down an analysis batch.
pub struct MarketDataService {
    quote_providers: Vec<Arc<dyn QuoteProvider>>,
    fundamentals: Arc<dyn FundamentalsProvider>,
    history: Arc<dyn HistoryProvider>,
    cache: Arc<dyn CacheStore>,
    quote_ttl: Duration,
}

impl MarketDataService {
    /// Build the production chain: Yahoo first, then Alpha Vantage and IEX
    /// when their keys are configured.
    pub fn from_config(config: &MarketDataConfig, cache: Arc<dyn CacheStore>) -> Self {
        let yahoo = Arc::new(YahooProvider::new(config.request_timeout));

        let mut quote_providers: Vec<Arc<dyn QuoteProvider>> = vec![yahoo.clone()];
        if let Some(key) = &config.alpha_vantage_api_key {
            quote_providers.push(Arc::new(AlphaVantageProvider::new(
                key.clone(),
                config.request_timeout,
            )));
        }
        if let Some(token) = &config.iex_cloud_api_key {
            quote_providers.push(Arc::new(IexProvider::new(
                token.clone(),
                config.request_timeout,
            )));
        }

        Self {
            quote_providers,
            fundamentals: yahoo.clone(),
            history: yahoo,
            cache,
            quote_ttl: config.quote_ttl,
        }
    }

    /// Assemble a service from explicit parts. Tests inject stub providers
    /// through this.
    pub fn new(
        quote_providers: Vec<Arc<dyn QuoteProvider>>,
        fundamentals: Arc<dyn FundamentalsProvider>,
        history: Arc<dyn HistoryProvider>,
        cache: Arc<dyn CacheStore>,
        quote_ttl: Duration,
    ) -> Self {
        Self {
            quote_providers,
            fundamentals,
            history,
            cache,
            quote_ttl,
        }
    }

    /// Resolve a current quote, or `None` when no provider can serve the
    /// symbol right now. Never an error: every provider failure is a logged
    /// fallthrough to the next provider in the chain.
    pub async fn get_quote(&self, symbol: &str, exchange: Exchange) -> Option<StockQuote> {
        let cache_key = format!("quote:{}:{}", symbol, exchange);
        if let Some(cached) = self.cache.get(&cache_key).await {
            match serde_json::from_str(&cached) {
                Ok(quote) => return Some(quote),
                Err(e) => tracing::warn!("discarding malformed cached quote {}: {}", cache_key, e),
            }
        }

        for provider in &self.quote_providers {
            if !provider.supports(exchange) {
                continue;
            }
            match provider.fetch_quote(symbol, exchange).await {
                Ok(Some(quote)) => {
                    tracing::debug!(
                        "quote for {}:{} resolved by {}",
                        symbol,
                        exchange,
                        provider.name()
                    );
                    if let Ok(json) = serde_json::to_string(&quote) {
                        self.cache.set(&cache_key, json, self.quote_ttl).await;
                    }
                    return Some(quote);
                }
                Ok(None) => {
                    tracing::debug!(
                        "{} had no usable quote for {}:{}",
                        provider.name(),
                        symbol,
                        exchange
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "{} quote fetch failed for {}:{}: {}",
                        provider.name(),
                        symbol,
                        exchange,
                        e
                    );
                }
            }
        }

        None
    }

    /// Fundamental ratios for a symbol. Fails open to an all-absent set.
    pub async fn get_fundamentals(&self, symbol: &str, exchange: Exchange) -> FundamentalMetrics {
        match self.fundamentals.fetch_fundamentals(symbol, exchange).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!("fundamentals fetch failed for {}: {}", symbol, e);
                FundamentalMetrics::default()
            }
        }
    }

    /// Daily closes over the requested range, oldest first. Fails open to
    /// an empty series.
    pub async fn get_price_history(
        &self,
        symbol: &str,
        exchange: Exchange,
        range: HistoryRange,
    ) -> Vec<Candle> {
        match self.history.fetch_history(symbol, exchange, range).await {
            Ok(candles) => candles,
            Err(e) => {
                tracing::warn!("history fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_cache::MemoryCache;
    use advisor_core::AdvisorError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quote(symbol: &str, exchange: Exchange, price: f64) -> StockQuote {
        StockQuote {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            exchange,
            current_price: price,
            previous_close: price - 1.0,
            change: 1.0,
            change_percent: 1.0 / (price - 1.0) * 100.0,
            day_high: price + 1.0,
            day_low: price - 2.0,
            volume: 1_000_000,
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
            week_52_high: price + 10.0,
            week_52_low: price - 10.0,
            last_updated: Utc::now(),
        }
    }

    /// Stub provider returning a fixed outcome and counting calls.
    struct StubProvider {
        name: &'static str,
        us_only: bool,
        outcome: Result<Option<f64>, ()>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(name: &'static str, price: f64) -> Self {
            Self {
                name,
                us_only: false,
                outcome: Ok(Some(price)),
                calls: AtomicUsize::new(0),
            }
        }

        fn empty(name: &'static str) -> Self {
            Self {
                name,
                us_only: false,
                outcome: Ok(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                us_only: false,
                outcome: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn us_only(mut self) -> Self {
            self.us_only = true;
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, exchange: Exchange) -> bool {
            !self.us_only || exchange.is_us()
        }

        async fn fetch_quote(
            &self,
            symbol: &str,
            exchange: Exchange,
        ) -> Result<Option<StockQuote>, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(Some(price)) => Ok(Some(quote(symbol, exchange, price))),
                Ok(None) => Ok(None),
                Err(()) => Err(AdvisorError::Provider("stub outage".to_string())),
            }
        }
    }

    struct NoFundamentals;

    #[async_trait]
    impl FundamentalsProvider for NoFundamentals {
        async fn fetch_fundamentals(
            &self,
            _symbol: &str,
            _exchange: Exchange,
        ) -> Result<FundamentalMetrics, AdvisorError> {
            Err(AdvisorError::Provider("unavailable".to_string()))
        }
    }

    struct NoHistory;

    #[async_trait]
    impl HistoryProvider for NoHistory {
        async fn fetch_history(
            &self,
            _symbol: &str,
            _exchange: Exchange,
            _range: HistoryRange,
        ) -> Result<Vec<Candle>, AdvisorError> {
            Err(AdvisorError::Provider("unavailable".to_string()))
        }
    }

    fn service(providers: Vec<Arc<dyn QuoteProvider>>) -> MarketDataService {
        MarketDataService::new(
            providers,
            Arc::new(NoFundamentals),
            Arc::new(NoHistory),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn first_usable_provider_wins_and_stops_the_chain() {
        let primary = Arc::new(StubProvider::ok("primary", 100.0));
        let secondary = Arc::new(StubProvider::ok("secondary", 50.0));
        let svc = service(vec![primary.clone(), secondary.clone()]);

        let quote = svc.get_quote("AAPL", Exchange::Nasdaq).await.unwrap();
        assert_eq!(quote.current_price, 100.0);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn failed_primary_falls_through_to_secondary() {
        let primary = Arc::new(StubProvider::failing("primary"));
        let empty = Arc::new(StubProvider::empty("empty"));
        let secondary = Arc::new(StubProvider::ok("secondary", 42.0));
        let svc = service(vec![primary.clone(), empty.clone(), secondary.clone()]);

        let quote = svc.get_quote("MSFT", Exchange::Nasdaq).await.unwrap();
        assert_eq!(quote.current_price, 42.0);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(empty.call_count(), 1);
    }

    #[tokio::test]
    async fn all_providers_failing_yields_absent_not_error() {
        let svc = service(vec![
            Arc::new(StubProvider::failing("a")),
            Arc::new(StubProvider::empty("b")),
        ]);
        assert!(svc.get_quote("GOOG", Exchange::Nasdaq).await.is_none());
    }

    #[tokio::test]
    async fn us_only_provider_is_skipped_for_international_exchange() {
        let us_only = Arc::new(StubProvider::ok("iex", 10.0).us_only());
        let svc = service(vec![us_only.clone()]);

        assert!(svc.get_quote("SHEL", Exchange::Lse).await.is_none());
        assert_eq!(us_only.call_count(), 0);

        assert!(svc.get_quote("JPM", Exchange::Nyse).await.is_some());
        assert_eq!(us_only.call_count(), 1);
    }

    #[tokio::test]
    async fn resolved_quote_is_served_from_cache_on_repeat() {
        let primary = Arc::new(StubProvider::ok("primary", 77.0));
        let svc = service(vec![primary.clone()]);

        let first = svc.get_quote("V", Exchange::Nyse).await.unwrap();
        let second = svc.get_quote("V", Exchange::Nyse).await.unwrap();
        assert_eq!(first.current_price, second.current_price);
        assert_eq!(primary.call_count(), 1);
    }

    #[tokio::test]
    async fn fundamentals_and_history_fail_open() {
        let svc = service(vec![Arc::new(StubProvider::ok("primary", 1.0))]);

        let metrics = svc.get_fundamentals("AAPL", Exchange::Nasdaq).await;
        assert_eq!(metrics, FundamentalMetrics::default());

        let history = svc
            .get_price_history("AAPL", Exchange::Nasdaq, HistoryRange::ThreeMonths)
            .await;
        assert!(history.is_empty());
    }
}
