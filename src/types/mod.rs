pub use self::{
    binance_ticker::BinanceTicker,
    coingecko_market::CoinGeckoMarket,
    fixer_rates::FixerRates,
    price_response::{
        AllPriceResponse, ApiResponse, SelectFiats, SelectTokens,
    },
    whitelist::Whitelist,
};

mod binance_ticker;
mod coingecko_market;
mod fixer_rates;
mod price_response;
mod whitelist;
