use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use advisor_core::{
    AdvisorError, Candle, Exchange, FundamentalMetrics, FundamentalsProvider, HistoryProvider,
    HistoryRange, QuoteProvider, StockQuote,
};

const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance client. Primary provider: free, covers international
/// exchanges via symbol suffixes, and also serves fundamentals and history.
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; stock-advisor)")
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

#[derive(Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<YahooQuote>,
}

#[derive(Deserialize)]
struct YahooQuote {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketPreviousClose")]
    regular_market_previous_close: Option<f64>,
    #[serde(rename = "regularMarketDayHigh")]
    regular_market_day_high: Option<f64>,
    #[serde(rename = "regularMarketDayLow")]
    regular_market_day_low: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<i64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    #[serde(rename = "trailingAnnualDividendYield")]
    trailing_annual_dividend_yield: Option<f64>,
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<f64>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<f64>,
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_quote(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<Option<StockQuote>, AdvisorError> {
        let full_symbol = exchange.provider_symbol(symbol);

        let response = self
            .client
            .get(QUOTE_URL)
            .query(&[("symbols", full_symbol.as_str())])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Provider(format!(
                "yahoo HTTP {} for {}",
                response.status(),
                full_symbol
            )));
        }

        let envelope: QuoteEnvelope = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        let Some(raw) = envelope.quote_response.result.into_iter().next() else {
            return Ok(None);
        };

        // A payload without a live price is unusable.
        let Some(current_price) = raw.regular_market_price else {
            return Ok(None);
        };

        let previous_close = raw.regular_market_previous_close.unwrap_or(current_price);
        let change = current_price - previous_close;
        let change_percent = if previous_close > 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Ok(Some(StockQuote {
            symbol: symbol.to_string(),
            name: raw
                .long_name
                .or(raw.short_name)
                .unwrap_or_else(|| symbol.to_string()),
            exchange,
            current_price,
            previous_close,
            change,
            change_percent,
            day_high: raw.regular_market_day_high.unwrap_or(current_price),
            day_low: raw.regular_market_day_low.unwrap_or(current_price),
            volume: raw.regular_market_volume.unwrap_or(0),
            market_cap: raw.market_cap,
            pe_ratio: raw.trailing_pe,
            dividend_yield: raw.trailing_annual_dividend_yield,
            week_52_high: raw.fifty_two_week_high.unwrap_or(current_price),
            week_52_low: raw.fifty_two_week_low.unwrap_or(current_price),
            last_updated: Utc::now(),
        }))
    }
}

// quoteSummary wraps every numeric field as {"raw": .., "fmt": ".."}.
#[derive(Deserialize, Default)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn value(&self) -> Option<f64> {
        self.raw
    }

    /// Provider fractions become percentages; a real 0.0 stays 0.0.
    fn percent(&self) -> Option<f64> {
        self.raw.map(|v| v * 100.0)
    }
}

#[derive(Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Vec<SummaryResult>,
}

#[derive(Deserialize, Default)]
struct SummaryResult {
    #[serde(rename = "financialData", default)]
    financial_data: FinancialData,
    #[serde(rename = "defaultKeyStatistics", default)]
    key_statistics: KeyStatistics,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: SummaryDetail,
}

#[derive(Deserialize, Default)]
struct FinancialData {
    #[serde(rename = "debtToEquity", default)]
    debt_to_equity: RawValue,
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: RawValue,
    #[serde(rename = "returnOnAssets", default)]
    return_on_assets: RawValue,
    #[serde(rename = "currentRatio", default)]
    current_ratio: RawValue,
    #[serde(rename = "revenueGrowth", default)]
    revenue_growth: RawValue,
    #[serde(rename = "earningsGrowth", default)]
    earnings_growth: RawValue,
}

#[derive(Deserialize, Default)]
struct KeyStatistics {
    #[serde(rename = "priceToBook", default)]
    price_to_book: RawValue,
}

#[derive(Deserialize, Default)]
struct SummaryDetail {
    #[serde(rename = "trailingPE", default)]
    trailing_pe: RawValue,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: RawValue,
    #[serde(rename = "priceToSalesTrailing12Months", default)]
    price_to_sales: RawValue,
}

#[async_trait]
impl FundamentalsProvider for YahooProvider {
    async fn fetch_fundamentals(
        &self,
        symbol: &str,
        exchange: Exchange,
    ) -> Result<FundamentalMetrics, AdvisorError> {
        let full_symbol = exchange.provider_symbol(symbol);
        let url = format!("{}/{}", SUMMARY_URL, full_symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "financialData,defaultKeyStatistics,summaryDetail")])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Provider(format!(
                "yahoo quoteSummary HTTP {} for {}",
                response.status(),
                full_symbol
            )));
        }

        let envelope: SummaryEnvelope = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        let result = envelope
            .quote_summary
            .result
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(FundamentalMetrics {
            pe_ratio: result.summary_detail.trailing_pe.value(),
            pb_ratio: result.key_statistics.price_to_book.value(),
            debt_to_equity: result.financial_data.debt_to_equity.value(),
            roe: result.financial_data.return_on_equity.percent(),
            roa: result.financial_data.return_on_assets.percent(),
            current_ratio: result.financial_data.current_ratio.value(),
            revenue_growth: result.financial_data.revenue_growth.percent(),
            earnings_growth: result.financial_data.earnings_growth.percent(),
            dividend_yield: result.summary_detail.dividend_yield.percent(),
            price_to_sales: result.summary_detail.price_to_sales.value(),
        })
    }
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Vec<ChartResult>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[async_trait]
impl HistoryProvider for YahooProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        exchange: Exchange,
        range: HistoryRange,
    ) -> Result<Vec<Candle>, AdvisorError> {
        let full_symbol = exchange.provider_symbol(symbol);
        let url = format!("{}/{}", CHART_URL, full_symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Provider(format!(
                "yahoo chart HTTP {} for {}",
                response.status(),
                full_symbol
            )));
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(e.to_string()))?;

        let Some(result) = envelope.chart.result.into_iter().next() else {
            return Ok(Vec::new());
        };
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let mut candles = Vec::with_capacity(result.timestamp.len());
        for (i, ts) in result.timestamp.iter().enumerate() {
            // Rows with a null close are trading halts or padding; drop them.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let date = DateTime::<Utc>::from_timestamp(*ts, 0).unwrap_or_else(Utc::now);
            candles.push(Candle {
                date,
                open: quote.open.get(i).copied().flatten().unwrap_or(close),
                high: quote.high.get(i).copied().flatten().unwrap_or(close),
                low: quote.low.get(i).copied().flatten().unwrap_or(close),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
            });
        }

        Ok(candles)
    }
}
