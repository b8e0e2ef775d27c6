use advisor_core::Exchange;

/// Curated large-cap tickers per exchange. In production this would come
/// from a listings database; the static table keeps the candidate set
/// bounded and deterministic.
fn exchange_universe(exchange: Exchange) -> &'static [&'static str] {
    match exchange {
        Exchange::Nyse => &[
            "AAPL", "MSFT", "GOOGL", "AMZN", "JPM", "JNJ", "V", "PG", "UNH", "HD",
        ],
        Exchange::Nasdaq => &[
            "NVDA", "META", "TSLA", "NFLX", "ADBE", "INTC", "AMD", "PYPL", "CSCO", "CMCSA",
        ],
        Exchange::Lse => &[
            "SHEL", "HSBA", "BP", "RIO", "GSK", "ULVR", "AZN", "BATS", "DGE", "LLOY",
        ],
        Exchange::Tse => &[
            "7203", "6758", "9984", "6861", "8306", "9432", "4502", "6501", "7267", "6902",
        ],
        Exchange::Hkex => &[
            "0700", "9988", "0005", "1299", "0941", "2318", "1398", "0883", "0388", "2628",
        ],
        Exchange::Bse | Exchange::Nse => &[
            "RELIANCE", "TCS", "HDFCBANK", "INFY", "ICICIBANK", "HINDUNILVR", "ITC",
            "BHARTIARTL", "KOTAKBANK", "LT",
        ],
        // No curated list for the remaining exchanges yet.
        _ => &[],
    }
}

/// Union of candidate symbols across the requested exchanges, deduplicated,
/// first-seen order preserved so batch output stays deterministic.
pub fn candidate_symbols(exchanges: &[Exchange]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for exchange in exchanges {
        for symbol in exchange_universe(*exchange) {
            if !candidates.iter().any(|c| c == symbol) {
                candidates.push((*symbol).to_string());
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_exchange_returns_its_table() {
        let symbols = candidate_symbols(&[Exchange::Nyse]);
        assert_eq!(symbols.len(), 10);
        assert!(symbols.contains(&"AAPL".to_string()));
    }

    #[test]
    fn union_across_exchanges_is_deduplicated() {
        // BSE and NSE share the same large caps.
        let symbols = candidate_symbols(&[Exchange::Bse, Exchange::Nse]);
        assert_eq!(symbols.len(), 10);

        let disjoint = candidate_symbols(&[Exchange::Nyse, Exchange::Nasdaq]);
        assert_eq!(disjoint.len(), 20);
    }

    #[test]
    fn uncurated_exchange_yields_no_candidates() {
        assert!(candidate_symbols(&[Exchange::Sse]).is_empty());
        assert!(candidate_symbols(&[]).is_empty());
    }
}
