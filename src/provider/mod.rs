pub use self::{
    binance::Binance,
    coingecko::Coingecko,
    database::DatabasePool,
    fixer::Fixer,
    http::HTTP,
    source::{PriceObservation, PriceSource},
    store::{ChainRegistry, PriceStore},
};

mod binance;
mod coingecko;
mod database;
mod fixer;
mod http;
mod source;
mod store;
