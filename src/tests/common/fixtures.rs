use std::{sync::Arc, time::Duration};

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use chrono::Utc;

use crate::{
    cache::{KeyValueCache, MokaCache},
    configuration::{AppState, Config, State},
    error::Error,
    model::{Provider, Registry_Denom},
    provider::{
        ChainRegistry, PriceObservation, PriceSource, PriceStore, HTTP,
    },
    types::Whitelist,
};

pub fn test_config() -> Config {
    Config {
        server_host: String::from("127.0.0.1"),
        port: 0,
        allowed_origins: vec![String::from("*")],
        database_url: String::from("postgres://localhost/oracle_test"),
        max_connections: 5,
        timeout: 2,
        subscription_interval: String::from("10s"),
        aggregation_interval: String::from("5s"),
        price_freshness: Duration::from_secs(300),
        rate_limit_pause_ms: 0,
        whitelist_fiats: vec![
            String::from("EUR"),
            String::from("KRW"),
            String::from("CHF"),
        ],
        fixer_api_key: String::from("test"),
        binance_url: String::from("http://127.0.0.1:9/api/v3/ticker/price"),
        coingecko_url: String::from("http://127.0.0.1:9/api/v3/coins/markets"),
        fixer_url: String::from("http://127.0.0.1:9/api/latest"),
        cache_ttl_prices: 10,
        cache_ttl_select: 10,
        cache_max_capacity: 1000,
        log_level: String::from("debug"),
    }
}

pub fn state_with(
    config: Config,
    store: Arc<dyn PriceStore>,
    registry: Arc<dyn ChainRegistry>,
    cache: Option<Arc<dyn KeyValueCache>>,
) -> AppState<State> {
    let cache = cache.unwrap_or_else(|| {
        Arc::new(MokaCache::new(config.cache_max_capacity))
    });
    let http = HTTP::new(config.clone()).unwrap();

    AppState::new(State::new(config, store, registry, http, cache))
}

pub fn test_state(
    store: Arc<dyn PriceStore>,
    registry: Arc<dyn ChainRegistry>,
) -> AppState<State> {
    state_with(test_config(), store, registry, None)
}

/// A cache whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl KeyValueCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, Error> {
        Err(Error::Cache(String::from("connection refused")))
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _payload: Vec<u8>,
        _ttl: Duration,
    ) -> Result<(), Error> {
        Err(Error::Cache(String::from("connection refused")))
    }
}

pub fn symbols(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("USDX{:02}", i)).collect()
}

pub fn denom(
    ticker: &str,
    price_id: Option<&str>,
    fetch_price: bool,
) -> Registry_Denom {
    Registry_Denom {
        ticker: Some(ticker.to_owned()),
        price_id: price_id.map(str::to_owned),
        fetch_price,
    }
}

pub fn whitelist(
    tickers: &[&str],
    price_ids: &[&str],
    fiat_codes: &[&str],
) -> Whitelist {
    let owned = |items: &[&str]| -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    };

    Whitelist {
        token_tickers: owned(tickers),
        price_ids: owned(price_ids),
        fiat_codes: owned(fiat_codes),
    }
}

/// Starts an in-process HTTP server with the given routes on a free local
/// port and returns its base URL.
pub async fn fake_provider<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();
    let address = server.addrs()[0];

    actix_web::rt::spawn(server.run());

    format!("http://{}", address)
}

/// A `PriceSource` returning canned observations for whitelisted symbols,
/// stamped at fetch time unless pinned with `at`.
pub struct StaticSource {
    provider: Provider,
    observations: Vec<PriceObservation>,
    observed_at: Option<i64>,
    fail: bool,
}

impl StaticSource {
    pub fn new(provider: Provider) -> Self {
        StaticSource {
            provider,
            observations: vec![],
            observed_at: None,
            fail: false,
        }
    }

    pub fn failing(provider: Provider) -> Self {
        StaticSource {
            fail: true,
            ..StaticSource::new(provider)
        }
    }

    pub fn at(mut self, observed_at: i64) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    pub fn with(mut self, symbol: &str, price: f64, supply: Option<f64>) -> Self {
        self.observations.push(PriceObservation {
            symbol: symbol.to_owned(),
            price,
            observed_at: 0,
            supply,
        });
        self
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(
        &self,
        whitelist: &Whitelist,
    ) -> Result<Vec<PriceObservation>, Error> {
        if self.fail {
            return Err(Error::ProviderStatus {
                provider: self.provider,
                status: 503,
                body: String::from("unavailable"),
            });
        }

        let allowed = match self.provider {
            Provider::Fixer => whitelist.fiat_symbols(),
            Provider::Binance | Provider::Coingecko => whitelist.token_symbols(),
        };
        if allowed.is_empty() {
            return Err(Error::NoTokensToFetch(self.provider));
        }

        let observed_at =
            self.observed_at.unwrap_or_else(|| Utc::now().timestamp_millis());

        Ok(self
            .observations
            .iter()
            .filter(|o| allowed.contains(&o.symbol))
            .map(|o| PriceObservation {
                observed_at,
                ..o.clone()
            })
            .collect())
    }
}
