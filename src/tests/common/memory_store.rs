use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    error::Error,
    model::{
        Fiat_Price, Provider, Registry_Denom, Source_Price, Source_Supply,
        Token_Price,
    },
    provider::{ChainRegistry, PriceStore},
};

/// In-memory `PriceStore` with the same upsert semantics as the Postgres
/// tables. Writes for symbols in `failing_symbols` fail like a dropped
/// connection.
#[derive(Default)]
pub struct MemoryStore {
    prices: Mutex<HashMap<(Provider, String), Source_Price>>,
    supplies: Mutex<HashMap<(Provider, String), f64>>,
    tokens: Mutex<HashMap<String, Token_Price>>,
    fiats: Mutex<HashMap<String, Fiat_Price>>,
    failing_symbols: Vec<String>,
}

impl MemoryStore {
    pub fn failing_on(symbols: &[&str]) -> Self {
        MemoryStore {
            failing_symbols: symbols.iter().map(|s| s.to_string()).collect(),
            ..MemoryStore::default()
        }
    }

    fn check(&self, symbol: &str) -> Result<(), Error> {
        if self.failing_symbols.iter().any(|s| s == symbol) {
            return Err(Error::SQL(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn seed_price(
        &self,
        provider: Provider,
        symbol: &str,
        price: f64,
        updated_at: i64,
    ) {
        self.prices.lock().unwrap().insert(
            (provider, symbol.to_owned()),
            Source_Price {
                symbol: symbol.to_owned(),
                price,
                updated_at,
            },
        );
    }

    pub fn seed_supply(&self, provider: Provider, symbol: &str, supply: f64) {
        self.supplies
            .lock()
            .unwrap()
            .insert((provider, symbol.to_owned()), supply);
    }

    pub fn seed_token(&self, symbol: &str, price: f64, supply: Option<f64>) {
        self.tokens.lock().unwrap().insert(
            symbol.to_owned(),
            Token_Price {
                symbol: symbol.to_owned(),
                price,
                supply,
            },
        );
    }

    pub fn seed_fiat(&self, symbol: &str, price: f64) {
        self.fiats.lock().unwrap().insert(
            symbol.to_owned(),
            Fiat_Price {
                symbol: symbol.to_owned(),
                price,
            },
        );
    }

    pub fn price(&self, provider: Provider, symbol: &str) -> Option<f64> {
        self.prices
            .lock()
            .unwrap()
            .get(&(provider, symbol.to_owned()))
            .map(|row| row.price)
    }

    pub fn supply(&self, provider: Provider, symbol: &str) -> Option<f64> {
        self.supplies
            .lock()
            .unwrap()
            .get(&(provider, symbol.to_owned()))
            .copied()
    }

    pub fn row_count(&self, provider: Provider) -> usize {
        self.prices
            .lock()
            .unwrap()
            .keys()
            .filter(|(p, _)| *p == provider)
            .count()
    }

    pub fn token(&self, symbol: &str) -> Option<Token_Price> {
        self.tokens.lock().unwrap().get(symbol).cloned()
    }

    pub fn fiat(&self, symbol: &str) -> Option<Fiat_Price> {
        self.fiats.lock().unwrap().get(symbol).cloned()
    }
}

fn sorted_by_symbol<T, F>(mut rows: Vec<T>, symbol: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    rows.sort_by(|a, b| symbol(a).cmp(symbol(b)));
    rows
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn upsert_price(
        &self,
        provider: Provider,
        symbol: &str,
        price: f64,
        updated_at: i64,
    ) -> Result<(), Error> {
        self.check(symbol)?;
        self.seed_price(provider, symbol, price, updated_at);
        Ok(())
    }

    async fn upsert_supply(
        &self,
        provider: Provider,
        symbol: &str,
        supply: f64,
    ) -> Result<(), Error> {
        if provider.supply_table().is_none() {
            return Err(Error::NoSupplyTable(provider));
        }
        self.check(symbol)?;
        self.seed_supply(provider, symbol, supply);
        Ok(())
    }

    async fn get_source_prices(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Price>, Error> {
        let rows = self
            .prices
            .lock()
            .unwrap()
            .iter()
            .filter(|((p, s), _)| *p == provider && symbols.contains(s))
            .map(|(_, row)| row.clone())
            .collect();
        Ok(sorted_by_symbol(rows, |r: &Source_Price| r.symbol.as_str()))
    }

    async fn get_source_supplies(
        &self,
        provider: Provider,
        symbols: &[String],
    ) -> Result<Vec<Source_Supply>, Error> {
        let rows = self
            .supplies
            .lock()
            .unwrap()
            .iter()
            .filter(|((p, s), _)| *p == provider && symbols.contains(s))
            .map(|((_, symbol), supply)| Source_Supply {
                symbol: symbol.clone(),
                supply: *supply,
            })
            .collect();
        Ok(sorted_by_symbol(rows, |r: &Source_Supply| r.symbol.as_str()))
    }

    async fn upsert_token(&self, token: &Token_Price) -> Result<(), Error> {
        self.check(&token.symbol)?;
        let mut tokens = self.tokens.lock().unwrap();
        let supply = token.supply.or_else(|| {
            tokens.get(&token.symbol).and_then(|existing| existing.supply)
        });
        tokens.insert(
            token.symbol.clone(),
            Token_Price {
                symbol: token.symbol.clone(),
                price: token.price,
                supply,
            },
        );
        Ok(())
    }

    async fn upsert_fiat(&self, fiat: &Fiat_Price) -> Result<(), Error> {
        self.check(&fiat.symbol)?;
        self.seed_fiat(&fiat.symbol, fiat.price);
        Ok(())
    }

    async fn get_tokens(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Token_Price>, Error> {
        let rows = self
            .tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| symbols.contains(&t.symbol))
            .cloned()
            .collect();
        Ok(sorted_by_symbol(rows, |r: &Token_Price| r.symbol.as_str()))
    }

    async fn get_fiats(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Fiat_Price>, Error> {
        let rows = self
            .fiats
            .lock()
            .unwrap()
            .values()
            .filter(|f| symbols.contains(&f.symbol))
            .cloned()
            .collect();
        Ok(sorted_by_symbol(rows, |r: &Fiat_Price| r.symbol.as_str()))
    }
}

pub struct MemoryRegistry {
    denoms: Vec<Registry_Denom>,
    unreachable: bool,
}

impl MemoryRegistry {
    pub fn new(denoms: Vec<Registry_Denom>) -> Self {
        MemoryRegistry {
            denoms,
            unreachable: false,
        }
    }

    pub fn unreachable() -> Self {
        MemoryRegistry {
            denoms: vec![],
            unreachable: true,
        }
    }
}

#[async_trait]
impl ChainRegistry for MemoryRegistry {
    async fn get_denoms(&self) -> Result<Vec<Registry_Denom>, Error> {
        if self.unreachable {
            return Err(Error::SQL(sqlx::Error::PoolTimedOut));
        }
        Ok(self.denoms.clone())
    }
}
