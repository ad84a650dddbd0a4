use std::{env, fs, io::ErrorKind, ops::Deref, sync::Arc, time::Duration};

use url::Url;

use crate::{
    cache::KeyValueCache,
    error::Error,
    helpers::parse_interval,
    provider::{ChainRegistry, PriceStore, HTTP},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Shared handles for every task and request. The pool behind `store` and
/// `registry` and the cache are safe for concurrent use without extra locks.
pub struct State {
    pub config: Config,
    pub store: Arc<dyn PriceStore>,
    pub registry: Arc<dyn ChainRegistry>,
    pub http: Arc<HTTP>,
    pub cache: Arc<dyn KeyValueCache>,
}

impl State {
    pub fn new(
        config: Config,
        store: Arc<dyn PriceStore>,
        registry: Arc<dyn ChainRegistry>,
        http: HTTP,
        cache: Arc<dyn KeyValueCache>,
    ) -> State {
        State {
            config,
            store,
            registry,
            http: Arc::new(http),
            cache,
        }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub database_url: String,
    pub max_connections: u32,
    pub timeout: u64,
    pub subscription_interval: String,
    pub aggregation_interval: String,
    pub price_freshness: Duration,
    pub rate_limit_pause_ms: u64,
    pub whitelist_fiats: Vec<String>,
    pub fixer_api_key: String,
    pub binance_url: String,
    pub coingecko_url: String,
    pub fixer_url: String,
    pub cache_ttl_prices: u64,
    pub cache_ttl_select: u64,
    pub cache_max_capacity: u64,
    pub log_level: String,
}

impl Config {
    pub fn get_binance_ticker_url(&self, symbol: &str) -> Result<Url, Error> {
        let url = Url::parse_with_params(&self.binance_url, &[("symbol", symbol)])?;
        Ok(url)
    }

    pub fn get_coingecko_markets_url(&self, ids: &[String]) -> Result<Url, Error> {
        let per_page = ids.len().clamp(1, 250).to_string();
        let url = Url::parse_with_params(
            &self.coingecko_url,
            &[
                ("vs_currency", "usd"),
                ("ids", ids.join(",").as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        )?;
        Ok(url)
    }

    pub fn get_fixer_rates_url(&self, codes: &[String]) -> Result<Url, Error> {
        let url = Url::parse_with_params(
            &self.fixer_url,
            &[
                ("access_key", self.fixer_api_key.as_str()),
                ("base", "USD"),
                ("symbols", codes.join(",").as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Intervals are kept as strings and parsed by each worker; checking them
    /// here turns a typo into a startup failure instead of a dead worker.
    pub fn validate_intervals(&self) -> Result<(), Error> {
        for (name, value) in [
            ("SUBSCRIPTION_INTERVAL", &self.subscription_interval),
            ("AGGREGATION_INTERVAL", &self.aggregation_interval),
        ] {
            parse_interval(value).map_err(|e| {
                Error::ConfigurationError(format!("{}: {}", name, e))
            })?;
        }

        Ok(())
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let server_host = var_or("SERVER_HOST", "0.0.0.0");
    let port: u16 = var_or("PORT", "8000").parse()?;
    let allowed_origins = split_list(&var_or("ALLOWED_ORIGINS", "*"));
    let max_connections: u32 = var_or("MAX_CONNECTIONS", "25").parse()?;
    let timeout: u64 = var_or("TIMEOUT", "2").parse()?;

    let subscription_interval = var_or("SUBSCRIPTION_INTERVAL", "10s");
    let aggregation_interval = var_or("AGGREGATION_INTERVAL", "5s");
    let price_freshness = parse_interval(&var_or("PRICE_FRESHNESS", "5m"))
        .map_err(|e| {
            Error::ConfigurationError(format!("PRICE_FRESHNESS: {}", e))
        })?;
    let rate_limit_pause_ms: u64 =
        var_or("RATE_LIMIT_PAUSE_MS", "1000").parse()?;

    let whitelist_fiats = split_list(&var_or("WHITELIST_FIATS", "EUR,KRW,CHF"))
        .into_iter()
        .map(|code| code.to_uppercase())
        .collect();
    let fixer_api_key = var_or("FIXER_API_KEY", "");

    let binance_url = var_or(
        "BINANCE_URL",
        "https://api.binance.com/api/v3/ticker/price",
    );
    let coingecko_url = var_or(
        "COINGECKO_URL",
        "https://api.coingecko.com/api/v3/coins/markets",
    );
    let fixer_url = var_or("FIXER_URL", "https://data.fixer.io/api/latest");

    let cache_ttl_prices: u64 = var_or("CACHE_TTL_PRICES", "10").parse()?;
    let cache_ttl_select: u64 = var_or("CACHE_TTL_SELECT", "10").parse()?;
    let cache_max_capacity: u64 =
        var_or("CACHE_MAX_CAPACITY", "10000").parse()?;
    let log_level = var_or("LOG_LEVEL", "info");

    let config = Config {
        server_host,
        port,
        allowed_origins,
        database_url,
        max_connections,
        timeout,
        subscription_interval,
        aggregation_interval,
        price_freshness,
        rate_limit_pause_ms,
        whitelist_fiats,
        fixer_api_key,
        binance_url,
        coingecko_url,
        fixer_url,
        cache_ttl_prices,
        cache_ttl_select,
        cache_max_capacity,
        log_level,
    };

    config.validate_intervals()?;

    Ok(config)
}

/// Loads `price-oracle.conf` and, when present, `.env` from the crate
/// directory into the process environment. Variables already set in the
/// environment are left untouched.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";
    let oracle_config_file: &str = "price-oracle.conf";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);
    let oracle_config_path = format!("{}/{}", directory, oracle_config_file);

    match fs::read_to_string(path) {
        Ok(config_string) => load_pairs(parse_config_string(&config_string)),
        Err(e) if e.kind() == ErrorKind::NotFound => {},
        Err(e) => return Err(Error::Io(e)),
    }

    let oracle_config_string = fs::read_to_string(oracle_config_path)?;
    load_pairs(parse_config_string(&oracle_config_string));

    Ok(())
}

fn load_pairs(pairs: Vec<(String, String)>) {
    for (key, value) in pairs {
        if env::var_os(&key).is_none() {
            env::set_var(key, value);
        }
    }
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_owned(), value.trim().to_owned()))
        })
        .collect()
}
