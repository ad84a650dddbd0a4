use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarket {
    pub id: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub circulating_supply: Option<f64>,
}
