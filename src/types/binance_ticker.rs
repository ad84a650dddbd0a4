use serde::Deserialize;

/// Body of `GET /api/v3/ticker/price?symbol=..`. Binance quotes prices as
/// decimal strings.
#[derive(Debug, Deserialize)]
pub struct BinanceTicker {
    pub symbol: String,
    pub price: String,
}
