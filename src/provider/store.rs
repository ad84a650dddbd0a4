use async_trait::async_trait;

use crate::{
    error::Error,
    model::{
        Fiat_Price, Provider, Registry_Denom, Source_Price, Source_Supply,
        Token_Price,
    },
};

/// Per-source and canonical price tables.
///
/// Every write is a single-symbol upsert executed in its own transaction:
/// update by symbol, insert when nothing was updated.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn upsert_price(
        &self,
        provider: Provider,
        symbol: &str,
        price: f64,
        updated_at: i64,
    ) -> Result<(), Error>;

    async fn upsert_supply(
        &self,
        provider: Provider,
        symbol: &str,
        supply: f64,
    ) -> Result<(), Error>;

    async fn get_source_prices(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Price>, Error>;

    async fn get_source_supplies(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Supply>, Error>;

    async fn upsert_token(&self, token: &Token_Price) -> Result<(), Error>;

    async fn upsert_fiat(&self, fiat: &Fiat_Price) -> Result<(), Error>;

    async fn get_tokens(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Token_Price>, Error>;

    async fn get_fiats(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Fiat_Price>, Error>;
}

/// Read-only view of the chain registry.
#[async_trait]
pub trait ChainRegistry: Send + Sync {
    async fn get_denoms(&self) -> Result<Vec<Registry_Denom>, Error>;
}
