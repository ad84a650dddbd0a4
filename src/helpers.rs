use std::{future::Future, time::Duration};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::{cache::KeyValueCache, error::Error};

/// Quote currency appended to token tickers.
pub const USDT_BASE_CURRENCY: &str = "USDT";

/// Base currency prefixed to fiat codes.
pub const USD_BASE_CURRENCY: &str = "USD";

/// Upper bound on the symbols a filtered request may name.
pub const MAX_SELECTED_SYMBOLS: usize = 10;

/// Parses a duration written the way the deployment configs write them:
/// a sequence of decimal numbers each followed by a unit (`ns`, `us`, `µs`,
/// `ms`, `s`, `m`, `h`), e.g. `10s`, `1m30s`, `1.5h`. Zero is rejected.
pub fn parse_interval(value: &str) -> Result<Duration, Error> {
    let input = value.trim();
    let invalid = |reason: &str| {
        Error::ConfigurationError(format!(
            "invalid interval {:?}: {}",
            value, reason
        ))
    };

    if input.is_empty() {
        return Err(invalid("empty"));
    }

    let mut nanos = 0f64;
    let mut rest = input;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(invalid("expected a number"));
        }
        let number: f64 = rest[..number_len]
            .parse()
            .map_err(|_| invalid("malformed number"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_nanos = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid("unknown unit")),
        };
        nanos += number * unit_nanos;
        rest = &rest[unit_len..];
    }

    if nanos < 1.0 {
        return Err(invalid("must be positive"));
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}

pub fn token_symbol(ticker: &str) -> String {
    format!("{}{}", ticker.trim().to_uppercase(), USDT_BASE_CURRENCY)
}

pub fn fiat_symbol(code: &str) -> String {
    format!("{}{}", USD_BASE_CURRENCY, code.trim().to_uppercase())
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Checks a filtered request against the size bounds and the whitelist and
/// returns the normalized symbols in request order.
pub fn validate_selection(
    requested: Option<Vec<String>>,
    whitelist: &[String],
) -> Result<Vec<String>, Error> {
    let requested = requested.ok_or_else(|| {
        Error::Validation(String::from("symbol list must not be null"))
    })?;

    if requested.is_empty() {
        return Err(Error::Validation(String::from(
            "symbol list must not be empty",
        )));
    }

    if requested.len() > MAX_SELECTED_SYMBOLS {
        return Err(Error::Validation(format!(
            "no more than {} symbols are allowed",
            MAX_SELECTED_SYMBOLS
        )));
    }

    let symbols: Vec<String> =
        requested.iter().map(|s| normalize_symbol(s)).collect();

    if let Some(symbol) = symbols.iter().find(|s| !whitelist.contains(s)) {
        return Err(Error::Validation(format!(
            "symbol {} is not whitelisted",
            symbol
        )));
    }

    Ok(symbols)
}

/// Cache key of a filtered request: the prefix plus the JSON array of the
/// normalized symbols, order preserved.
pub fn build_select_cache_key(
    prefix: &str,
    symbols: &[String],
) -> Result<String, Error> {
    Ok(format!("{}:{}", prefix, serde_json::to_string(symbols)?))
}

/// Cache-aside read: returns the cached value for `key` when it exists and
/// deserializes, otherwise runs `fetch_fn` and best-effort stores the result
/// for `ttl`. Cache failures are logged and never reach the caller.
pub async fn cached_fetch<T, F, Fut>(
    cache: &dyn KeyValueCache,
    key: &str,
    ttl: Duration,
    fetch_fn: F,
) -> Result<T, Error>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    match cache.get(key).await {
        Ok(Some(payload)) => match serde_json::from_slice::<T>(&payload) {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!(key, %error, "discarding unreadable cache entry");
            },
        },
        Ok(None) => {},
        Err(error) => {
            warn!(key, %error, "cache read failed, reading from store");
        },
    }

    let value = fetch_fn().await?;

    match serde_json::to_vec(&value) {
        Ok(payload) => {
            if let Err(error) = cache.set_with_ttl(key, payload, ttl).await {
                warn!(key, %error, "cache write failed");
            }
        },
        Err(error) => {
            warn!(key, %error, "could not serialize response for cache");
        },
    }

    Ok(value)
}
