//! advisor-cli: Generate stock recommendations from the command line.
//!
//! Usage:
//!   cargo run -p advisor-cli -- --risk moderate
//!   cargo run -p advisor-cli -- --symbols AAPL MSFT --exchanges NYSE NASDAQ
//!   cargo run -p advisor-cli -- --symbol SHEL --exchange LSE --risk conservative
//!   cargo run -p advisor-cli -- --history AAPL --range 6mo
//!   cargo run -p advisor-cli -- --risk aggressive --refresh --max 5

use std::sync::Arc;

use advisor_cache::MemoryCache;
use advisor_core::{Exchange, HistoryRange, InvestmentGoal, RiskTolerance, UserProfile};
use anyhow::{bail, Context};
use market_data::{MarketDataConfig, MarketDataService};
use recommendation_engine::{EngineConfig, RecommendationEngine};

fn parse_risk(value: &str) -> anyhow::Result<RiskTolerance> {
    match value.to_ascii_lowercase().as_str() {
        "conservative" => Ok(RiskTolerance::Conservative),
        "moderate" => Ok(RiskTolerance::Moderate),
        "aggressive" => Ok(RiskTolerance::Aggressive),
        other => bail!("unknown risk tolerance {:?}", other),
    }
}

fn parse_goal(value: &str) -> anyhow::Result<InvestmentGoal> {
    match value.to_ascii_lowercase().as_str() {
        "growth" => Ok(InvestmentGoal::Growth),
        "income" => Ok(InvestmentGoal::Income),
        "preservation" => Ok(InvestmentGoal::Preservation),
        "speculation" => Ok(InvestmentGoal::Speculation),
        other => bail!("unknown investment goal {:?}", other),
    }
}

fn parse_range(value: &str) -> anyhow::Result<HistoryRange> {
    match value.to_ascii_lowercase().as_str() {
        "1mo" => Ok(HistoryRange::OneMonth),
        "3mo" => Ok(HistoryRange::ThreeMonths),
        "6mo" => Ok(HistoryRange::SixMonths),
        "1y" => Ok(HistoryRange::OneYear),
        other => bail!("unknown history range {:?} (expected 1mo, 3mo, 6mo, or 1y)", other),
    }
}

fn parse_exchange(value: &str) -> anyhow::Result<Exchange> {
    Exchange::ALL
        .into_iter()
        .find(|ex| ex.code().eq_ignore_ascii_case(value))
        .with_context(|| format!("unknown exchange {:?}", value))
}

/// Values following `--flag`, up to the next `--` argument.
fn values_after<'a>(args: &'a [String], flag: &str) -> Option<Vec<&'a str>> {
    let start = args.iter().position(|a| a == flag)? + 1;
    Some(
        args[start..]
            .iter()
            .take_while(|a| !a.starts_with("--"))
            .map(|a| a.as_str())
            .collect(),
    )
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    values_after(args, flag).and_then(|vs| vs.first().copied())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisor_cli=info,recommendation_engine=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let risk = match value_after(&args, "--risk") {
        Some(v) => parse_risk(v)?,
        None => RiskTolerance::Moderate,
    };
    let goal = match value_after(&args, "--goal") {
        Some(v) => parse_goal(v)?,
        None => InvestmentGoal::Growth,
    };
    let exchanges: Vec<Exchange> = match values_after(&args, "--exchanges") {
        Some(codes) => codes
            .into_iter()
            .map(parse_exchange)
            .collect::<anyhow::Result<_>>()?,
        None => vec![Exchange::Nyse, Exchange::Nasdaq],
    };
    let symbols: Option<Vec<String>> = values_after(&args, "--symbols")
        .map(|vs| vs.into_iter().map(str::to_string).collect());
    let max: usize = value_after(&args, "--max")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let refresh = args.iter().any(|a| a == "--refresh");

    let profile = UserProfile {
        risk_tolerance: risk,
        investment_goal: goal,
        preferred_exchanges: exchanges.clone(),
    };

    let cache = Arc::new(MemoryCache::new());
    let market_data = Arc::new(MarketDataService::from_config(
        &MarketDataConfig::from_env(),
        cache.clone(),
    ));
    let engine = Arc::new(RecommendationEngine::new(
        market_data.clone(),
        cache,
        EngineConfig::from_env(),
    ));

    // --history prints raw daily closes instead of a recommendation.
    if let Some(symbol) = value_after(&args, "--history") {
        let exchange = match value_after(&args, "--exchange") {
            Some(v) => parse_exchange(v)?,
            None => Exchange::Nyse,
        };
        let range = match value_after(&args, "--range") {
            Some(v) => parse_range(v)?,
            None => HistoryRange::ThreeMonths,
        };
        let candles = market_data.get_price_history(symbol, exchange, range).await;
        if candles.is_empty() {
            println!("no price history for {}:{}", symbol, exchange);
            return Ok(());
        }
        for candle in &candles {
            println!("{}  {:>10.2}", candle.date.format("%Y-%m-%d"), candle.close);
        }
        return Ok(());
    }

    // --symbol/--exchange asks about one stock and skips the ranked batch.
    if let Some(symbol) = value_after(&args, "--symbol") {
        let exchange = match value_after(&args, "--exchange") {
            Some(v) => parse_exchange(v)?,
            None => Exchange::Nyse,
        };
        match engine.get_single_recommendation(symbol, exchange, &profile).await {
            Some(rec) => print_recommendation(&rec),
            None => println!(
                "nothing to recommend for {}:{} (no quote or confidence below threshold)",
                symbol, exchange
            ),
        }
        return Ok(());
    }

    let recommendations = if refresh {
        engine.refresh(&profile, max).await
    } else {
        engine
            .generate_recommendations(&profile, symbols, Some(exchanges), max)
            .await
    };

    if recommendations.is_empty() {
        println!("no recommendations cleared the confidence threshold");
        return Ok(());
    }
    for rec in &recommendations {
        print_recommendation(rec);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn range_tokens_cover_every_window() {
        assert_eq!(parse_range("1mo").unwrap(), HistoryRange::OneMonth);
        assert_eq!(parse_range("3mo").unwrap(), HistoryRange::ThreeMonths);
        assert_eq!(parse_range("6mo").unwrap(), HistoryRange::SixMonths);
        assert_eq!(parse_range("1Y").unwrap(), HistoryRange::OneYear);
        assert!(parse_range("2w").is_err());
    }

    #[test]
    fn risk_and_exchange_parse_case_insensitively() {
        assert_eq!(parse_risk("Moderate").unwrap(), RiskTolerance::Moderate);
        assert!(parse_risk("yolo").is_err());
        assert_eq!(parse_exchange("nyse").unwrap(), Exchange::Nyse);
        assert_eq!(parse_exchange("HKEX").unwrap(), Exchange::Hkex);
        assert!(parse_exchange("MOON").is_err());
    }

    #[test]
    fn flag_values_stop_at_the_next_flag() {
        let argv = args(&["bin", "--symbols", "AAPL", "MSFT", "--risk", "moderate"]);
        assert_eq!(
            values_after(&argv, "--symbols"),
            Some(vec!["AAPL", "MSFT"])
        );
        assert_eq!(value_after(&argv, "--risk"), Some("moderate"));
        assert_eq!(values_after(&argv, "--exchanges"), None);
    }
}

fn print_recommendation(rec: &advisor_core::Recommendation) {
    println!(
        "{:<8} {:<6} {:>11} conf {:.2}  price {:>9.2} -> {:>9.2} ({:+.2}%)  {}",
        rec.stock_symbol,
        rec.exchange,
        rec.recommendation_type.to_label(),
        rec.confidence_score,
        rec.current_price,
        rec.target_price,
        rec.potential_return,
        rec.rationale,
    );
}
