use serde::{Deserialize, Serialize};

/// Supported stock exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Nyse,
    Nasdaq,
    Lse,
    Tse,
    Hkex,
    Sse,
    Bse,
    Nse,
    Asx,
    Tsx,
    Fra,
    Six,
}

/// Static metadata for one exchange.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExchangeInfo {
    pub name: &'static str,
    pub country: &'static str,
    pub currency: &'static str,
    pub timezone: &'static str,
    pub open_time: &'static str,
    pub close_time: &'static str,
    /// Suffix appended to the symbol when querying the primary provider.
    pub symbol_suffix: &'static str,
}

impl Exchange {
    pub const ALL: [Exchange; 12] = [
        Exchange::Nyse,
        Exchange::Nasdaq,
        Exchange::Lse,
        Exchange::Tse,
        Exchange::Hkex,
        Exchange::Sse,
        Exchange::Bse,
        Exchange::Nse,
        Exchange::Asx,
        Exchange::Tsx,
        Exchange::Fra,
        Exchange::Six,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Nyse => "NYSE",
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Lse => "LSE",
            Exchange::Tse => "TSE",
            Exchange::Hkex => "HKEX",
            Exchange::Sse => "SSE",
            Exchange::Bse => "BSE",
            Exchange::Nse => "NSE",
            Exchange::Asx => "ASX",
            Exchange::Tsx => "TSX",
            Exchange::Fra => "FRA",
            Exchange::Six => "SIX",
        }
    }

    pub fn is_us(&self) -> bool {
        matches!(self, Exchange::Nyse | Exchange::Nasdaq)
    }

    pub fn info(&self) -> &'static ExchangeInfo {
        match self {
            Exchange::Nyse => &ExchangeInfo {
                name: "New York Stock Exchange",
                country: "USA",
                currency: "USD",
                timezone: "America/New_York",
                open_time: "09:30",
                close_time: "16:00",
                symbol_suffix: "",
            },
            Exchange::Nasdaq => &ExchangeInfo {
                name: "NASDAQ",
                country: "USA",
                currency: "USD",
                timezone: "America/New_York",
                open_time: "09:30",
                close_time: "16:00",
                symbol_suffix: "",
            },
            Exchange::Lse => &ExchangeInfo {
                name: "London Stock Exchange",
                country: "UK",
                currency: "GBP",
                timezone: "Europe/London",
                open_time: "08:00",
                close_time: "16:30",
                symbol_suffix: ".L",
            },
            Exchange::Tse => &ExchangeInfo {
                name: "Tokyo Stock Exchange",
                country: "Japan",
                currency: "JPY",
                timezone: "Asia/Tokyo",
                open_time: "09:00",
                close_time: "15:00",
                symbol_suffix: ".T",
            },
            Exchange::Hkex => &ExchangeInfo {
                name: "Hong Kong Stock Exchange",
                country: "Hong Kong",
                currency: "HKD",
                timezone: "Asia/Hong_Kong",
                open_time: "09:30",
                close_time: "16:00",
                symbol_suffix: ".HK",
            },
            Exchange::Sse => &ExchangeInfo {
                name: "Shanghai Stock Exchange",
                country: "China",
                currency: "CNY",
                timezone: "Asia/Shanghai",
                open_time: "09:30",
                close_time: "15:00",
                symbol_suffix: ".SS",
            },
            Exchange::Bse => &ExchangeInfo {
                name: "Bombay Stock Exchange",
                country: "India",
                currency: "INR",
                timezone: "Asia/Kolkata",
                open_time: "09:15",
                close_time: "15:30",
                symbol_suffix: ".BO",
            },
            Exchange::Nse => &ExchangeInfo {
                name: "National Stock Exchange (India)",
                country: "India",
                currency: "INR",
                timezone: "Asia/Kolkata",
                open_time: "09:15",
                close_time: "15:30",
                symbol_suffix: ".NS",
            },
            Exchange::Asx => &ExchangeInfo {
                name: "Australian Securities Exchange",
                country: "Australia",
                currency: "AUD",
                timezone: "Australia/Sydney",
                open_time: "10:00",
                close_time: "16:00",
                symbol_suffix: ".AX",
            },
            Exchange::Tsx => &ExchangeInfo {
                name: "Toronto Stock Exchange",
                country: "Canada",
                currency: "CAD",
                timezone: "America/Toronto",
                open_time: "09:30",
                close_time: "16:00",
                symbol_suffix: ".TO",
            },
            Exchange::Fra => &ExchangeInfo {
                name: "Frankfurt Stock Exchange",
                country: "Germany",
                currency: "EUR",
                timezone: "Europe/Berlin",
                open_time: "09:00",
                close_time: "17:30",
                symbol_suffix: ".F",
            },
            Exchange::Six => &ExchangeInfo {
                name: "SIX Swiss Exchange",
                country: "Switzerland",
                currency: "CHF",
                timezone: "Europe/Zurich",
                open_time: "09:00",
                close_time: "17:30",
                symbol_suffix: ".SW",
            },
        }
    }

    /// Symbol as the primary quote provider expects it, suffix applied.
    pub fn provider_symbol(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.info().symbol_suffix)
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_table_matches_provider_conventions() {
        assert_eq!(Exchange::Nyse.provider_symbol("AAPL"), "AAPL");
        assert_eq!(Exchange::Lse.provider_symbol("SHEL"), "SHEL.L");
        assert_eq!(Exchange::Tse.provider_symbol("7203"), "7203.T");
        assert_eq!(Exchange::Nse.provider_symbol("RELIANCE"), "RELIANCE.NS");
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Exchange::Nasdaq).unwrap();
        assert_eq!(json, "\"NASDAQ\"");
        let back: Exchange = serde_json::from_str("\"HKEX\"").unwrap();
        assert_eq!(back, Exchange::Hkex);
    }

    #[test]
    fn every_exchange_has_registry_metadata() {
        for ex in Exchange::ALL {
            let info = ex.info();
            assert!(!info.name.is_empty());
            assert!(!info.currency.is_empty());
            assert!(!info.timezone.is_empty());
        }
    }
}
