use serde::{Deserialize, Serialize};

/// Nifty 50 constituents, Yahoo-style NSE tickers.
pub const NIFTY_50: [&str; 50] = [
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "INFY.NS",
    "ICICIBANK.NS",
    "HINDUNILVR.NS",
    "ITC.NS",
    "SBIN.NS",
    "BHARTIARTL.NS",
    "KOTAKBANK.NS",
    "LT.NS",
    "ASIANPAINT.NS",
    "AXISBANK.NS",
    "MARUTI.NS",
    "SUNPHARMA.NS",
    "TITAN.NS",
    "BAJFINANCE.NS",
    "ULTRACEMCO.NS",
    "NESTLEIND.NS",
    "WIPRO.NS",
    "ONGC.NS",
    "NTPC.NS",
    "HCLTECH.NS",
    "TECHM.NS",
    "POWERGRID.NS",
    "TATAMOTORS.NS",
    "TATASTEEL.NS",
    "M&M.NS",
    "ADANIENT.NS",
    "BAJAJFINSV.NS",
    "COALINDIA.NS",
    "INDUSINDBK.NS",
    "DRREDDY.NS",
    "JSWSTEEL.NS",
    "GRASIM.NS",
    "CIPLA.NS",
    "DIVISLAB.NS",
    "HINDALCO.NS",
    "BPCL.NS",
    "BRITANNIA.NS",
    "EICHERMOT.NS",
    "HEROMOTOCO.NS",
    "APOLLOHOSP.NS",
    "BAJAJ-AUTO.NS",
    "TATACONSUM.NS",
    "ADANIPORTS.NS",
    "SHRIRAMFIN.NS",
    "UPL.NS",
    "SBILIFE.NS",
    "LTIM.NS",
];

const EXCHANGE_SUFFIX: &str = ".NS";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
}

impl Instrument {
    pub fn new(symbol: &str) -> Self {
        let symbol = symbol.trim().to_string();
        let name = symbol
            .strip_suffix(EXCHANGE_SUFFIX)
            .unwrap_or(&symbol)
            .to_string();
        Self { symbol, name }
    }
}

/// The screening basket: `override_symbols` (comma separated) when given, else the Nifty 50.
pub fn instruments(override_symbols: Option<&str>) -> Vec<Instrument> {
    let parsed: Vec<Instrument> = override_symbols
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(Instrument::new)
                .collect()
        })
        .unwrap_or_default();

    if parsed.is_empty() {
        return NIFTY_50.iter().map(|s| Instrument::new(s)).collect();
    }
    parsed
}

/// Keeps only the instruments whose symbol or display name is listed (case-insensitive).
pub fn filter_symbols(instruments: Vec<Instrument>, wanted: &[String]) -> Vec<Instrument> {
    if wanted.is_empty() {
        return instruments;
    }
    instruments
        .into_iter()
        .filter(|i| {
            wanted.iter().any(|w| {
                w.eq_ignore_ascii_case(&i.symbol) || w.eq_ignore_ascii_case(&i.name)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_exchange_suffix() {
        let i = Instrument::new("BAJAJ-AUTO.NS");
        assert_eq!(i.symbol, "BAJAJ-AUTO.NS");
        assert_eq!(i.name, "BAJAJ-AUTO");
        assert_eq!(Instrument::new("AAPL").name, "AAPL");
    }

    #[test]
    fn defaults_to_fifty_constituents() {
        let all = instruments(None);
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].name, "RELIANCE");
        assert!(all.iter().any(|i| i.symbol == "M&M.NS"));
    }

    #[test]
    fn override_replaces_basket() {
        let custom = instruments(Some(" TCS.NS, INFY.NS ,,"));
        assert_eq!(custom.len(), 2);
        assert_eq!(custom[1].name, "INFY");
        assert_eq!(instruments(Some(" , ")).len(), 50);
    }

    #[test]
    fn filter_matches_symbol_or_name() {
        let picked = filter_symbols(
            instruments(None),
            &["tcs".to_string(), "INFY.NS".to_string()],
        );
        let names: Vec<_> = picked.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["TCS", "INFY"]);
    }
}
