use std::time::Duration;

/// Provider credentials and tuning knobs, read from the environment.
/// A missing API key disables the corresponding fallback provider.
#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub alpha_vantage_api_key: Option<String>,
    pub iex_cloud_api_key: Option<String>,
    /// Per-request timeout for every provider call.
    pub request_timeout: Duration,
    /// How long a resolved quote stays fresh in the cache.
    pub quote_ttl: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            iex_cloud_api_key: None,
            request_timeout: Duration::from_secs(10),
            quote_ttl: Duration::from_secs(30),
        }
    }
}

impl MarketDataConfig {
    pub fn from_env() -> Self {
        let non_empty = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            alpha_vantage_api_key: non_empty("ALPHA_VANTAGE_API_KEY"),
            iex_cloud_api_key: non_empty("IEX_CLOUD_API_KEY"),
            request_timeout: Duration::from_secs(
                std::env::var("PROVIDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            quote_ttl: Duration::from_secs(
                std::env::var("QUOTE_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
