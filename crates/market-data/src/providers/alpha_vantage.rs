use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use advisor_core::{AdvisorError, Exchange, QuoteProvider, StockQuote};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage GLOBAL_QUOTE fallback. Only constructed when an API key is
/// configured. Quotes come back without a company name or valuation fields.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, api_key }
    }
}

// Every field arrives as a string, keyed like "05. price".
#[derive(Deserialize, Default)]
struct GlobalQuoteEnvelope {
    #[serde(rename = "Global Quote", default)]
    global_quote: GlobalQuote,
}

#[derive(Deserialize, Default)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
}

fn parse_f64(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_quote(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<Option<StockQuote>, AdvisorError> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Provider(format!(
                "alpha vantage HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let envelope: GlobalQuoteEnvelope = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;
        let raw = envelope.global_quote;

        let Some(current_price) = parse_f64(&raw.price) else {
            return Ok(None);
        };

        let previous_close = parse_f64(&raw.previous_close).unwrap_or(current_price);
        let change_percent = raw
            .change_percent
            .as_deref()
            .and_then(|v| v.trim().trim_end_matches('%').parse().ok())
            .unwrap_or(0.0);

        Ok(Some(StockQuote {
            symbol: symbol.to_string(),
            // GLOBAL_QUOTE carries no company name.
            name: symbol.to_string(),
            exchange,
            current_price,
            previous_close,
            change: parse_f64(&raw.change).unwrap_or(0.0),
            change_percent,
            day_high: parse_f64(&raw.high).unwrap_or(current_price),
            day_low: parse_f64(&raw.low).unwrap_or(current_price),
            volume: raw
                .volume
                .as_deref()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
            week_52_high: current_price,
            week_52_low: current_price,
            last_updated: Utc::now(),
        }))
    }
}
