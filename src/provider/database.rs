use async_trait::async_trait;

use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        Fiat_Price, Provider, Registry_Denom, Source_Price, Source_Supply,
        Table, Token_Price,
    },
};

use super::{ChainRegistry, PriceStore};

#[derive(Debug)]
pub struct DatabasePool {
    pub source_price: Table<Source_Price>,
    pub source_supply: Table<Source_Supply>,
    pub token: Table<Token_Price>,
    pub fiat: Table<Fiat_Price>,
    pub registry_denom: Table<Registry_Denom>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(config.max_connections)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            source_price: Table::new(pool.clone()),
            source_supply: Table::new(pool.clone()),
            token: Table::new(pool.clone()),
            fiat: Table::new(pool.clone()),
            registry_denom: Table::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl PriceStore for DatabasePool {
    async fn upsert_price(
        &self,
        provider: Provider,
        symbol: &str,
        price: f64,
        updated_at: i64,
    ) -> Result<(), Error> {
        self.source_price
            .upsert(provider.price_table(), symbol, price, updated_at)
            .await?;
        Ok(())
    }

    async fn upsert_supply(
        &self,
        provider: Provider,
        symbol: &str,
        supply: f64,
    ) -> Result<(), Error> {
        let table = provider
            .supply_table()
            .ok_or(Error::NoSupplyTable(provider))?;
        self.source_supply.upsert(table, symbol, supply).await?;
        Ok(())
    }

    async fn get_source_prices(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Price>, Error> {
        let rows = self
            .source_price
            .get_by_symbols(provider.price_table(), symbols)
            .await?;
        Ok(rows)
    }

    async fn get_source_supplies(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Supply>, Error> {
        match provider.supply_table() {
            Some(table) => {
                Ok(self.source_supply.get_by_symbols(table, symbols).await?)
            },
            None => Ok(vec![]),
        }
    }

    async fn upsert_token(&self, token: &Token_Price) -> Result<(), Error> {
        self.token.upsert(token).await?;
        Ok(())
    }

    async fn upsert_fiat(&self, fiat: &Fiat_Price) -> Result<(), Error> {
        self.fiat.upsert(fiat).await?;
        Ok(())
    }

    async fn get_tokens(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Token_Price>, Error> {
        Ok(self.token.get_by_symbols(symbols).await?)
    }

    async fn get_fiats(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Fiat_Price>, Error> {
        Ok(self.fiat.get_by_symbols(symbols).await?)
    }
}

#[async_trait]
impl ChainRegistry for DatabasePool {
    async fn get_denoms(&self) -> Result<Vec<Registry_Denom>, Error> {
        Ok(self.registry_denom.get_all().await?)
    }
}
