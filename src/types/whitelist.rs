use crate::helpers::{fiat_symbol, token_symbol};

/// Assets the service prices, resolved fresh on every use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Whitelist {
    /// Token tickers, e.g. `ATOM`.
    pub token_tickers: Vec<String>,
    /// CoinGecko ids, e.g. `cosmos`.
    pub price_ids: Vec<String>,
    /// ISO fiat codes, e.g. `EUR`.
    pub fiat_codes: Vec<String>,
}

impl Whitelist {
    pub fn token_symbols(&self) -> Vec<String> {
        self.token_tickers.iter().map(|t| token_symbol(t)).collect()
    }

    pub fn fiat_symbols(&self) -> Vec<String> {
        self.fiat_codes.iter().map(|c| fiat_symbol(c)).collect()
    }
}
