use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use advisor_core::{AdvisorError, Exchange, QuoteProvider, StockQuote};

const BASE_URL: &str = "https://cloud.iexapis.com/stable";

/// IEX Cloud fallback, US listings only. Last in the provider chain and
/// skipped entirely for non-US exchanges.
pub struct IexProvider {
    client: Client,
    api_token: String,
}

impl IexProvider {
    pub fn new(api_token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_token }
    }
}

#[derive(Deserialize)]
struct IexQuote {
    #[serde(rename = "companyName")]
    company_name: Option<String>,
    #[serde(rename = "latestPrice")]
    latest_price: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    change: Option<f64>,
    // IEX reports change as a fraction, not a percentage.
    #[serde(rename = "changePercent")]
    change_percent: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "peRatio")]
    pe_ratio: Option<f64>,
    #[serde(rename = "week52High")]
    week_52_high: Option<f64>,
    #[serde(rename = "week52Low")]
    week_52_low: Option<f64>,
}

#[async_trait]
impl QuoteProvider for IexProvider {
    fn name(&self) -> &'static str {
        "iex"
    }

    fn supports(&self, exchange: Exchange) -> bool {
        exchange.is_us()
    }

    async fn fetch_quote(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<Option<StockQuote>, AdvisorError> {
        let url = format!("{}/stock/{}/quote", BASE_URL, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("token", self.api_token.as_str())])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Provider(format!(
                "iex HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let raw: IexQuote = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        let Some(current_price) = raw.latest_price else {
            return Ok(None);
        };

        let previous_close = raw.previous_close.unwrap_or(current_price);

        Ok(Some(StockQuote {
            symbol: symbol.to_string(),
            name: raw.company_name.unwrap_or_else(|| symbol.to_string()),
            exchange,
            current_price,
            previous_close,
            change: raw.change.unwrap_or(0.0),
            change_percent: raw.change_percent.unwrap_or(0.0) * 100.0,
            day_high: raw.high.unwrap_or(current_price),
            day_low: raw.low.unwrap_or(current_price),
            volume: raw.volume.unwrap_or(0),
            market_cap: raw.market_cap,
            pe_ratio: raw.pe_ratio,
            dividend_yield: None,
            week_52_high: raw.week_52_high.unwrap_or(current_price),
            week_52_low: raw.week_52_low.unwrap_or(current_price),
            last_updated: Utc::now(),
        }))
    }
}
