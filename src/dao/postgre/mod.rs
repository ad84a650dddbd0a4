pub use self::types::{DataBase, PoolOption, PoolType, QueryResult};

mod fiat_price;
mod registry_denom;
mod source_price;
mod source_supply;
mod token_price;
mod types;
