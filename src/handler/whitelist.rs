use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{Provider, Registry_Denom},
    types::Whitelist,
};

/// Tickers of denoms flagged `fetch_price`, registry order, first occurrence
/// kept.
pub fn token_tickers(denoms: &[Registry_Denom]) -> Vec<String> {
    let mut tickers: Vec<String> = vec![];

    for denom in denoms.iter().filter(|d| d.fetch_price) {
        if let Some(ticker) = &denom.ticker {
            let ticker = ticker.trim().to_uppercase();
            if !ticker.is_empty() && !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }
    }

    tickers
}

pub fn price_ids(denoms: &[Registry_Denom]) -> Vec<String> {
    let mut ids: Vec<String> = vec![];

    for denom in denoms.iter().filter(|d| d.fetch_price) {
        if let Some(id) = &denom.price_id {
            let id = id.trim().to_owned();
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    ids
}

pub async fn resolve_token_tickers(
    state: &AppState<State>,
) -> Result<Vec<String>, Error> {
    let denoms = state.registry.get_denoms().await?;
    Ok(token_tickers(&denoms))
}

pub async fn resolve_price_ids(
    state: &AppState<State>,
) -> Result<Vec<String>, Error> {
    let denoms = state.registry.get_denoms().await?;
    Ok(price_ids(&denoms))
}

pub fn resolve_fiat_codes(state: &AppState<State>) -> Vec<String> {
    state.config.whitelist_fiats.clone()
}

/// Full whitelist from one registry read.
pub async fn resolve(state: &AppState<State>) -> Result<Whitelist, Error> {
    let denoms = state.registry.get_denoms().await?;

    Ok(Whitelist {
        token_tickers: token_tickers(&denoms),
        price_ids: price_ids(&denoms),
        fiat_codes: resolve_fiat_codes(state),
    })
}

/// The part of the whitelist `provider` consumes. Fiat sources never touch
/// the registry.
pub async fn resolve_for(
    provider: Provider,
    state: &AppState<State>,
) -> Result<Whitelist, Error> {
    match provider {
        Provider::Fixer => Ok(Whitelist {
            fiat_codes: resolve_fiat_codes(state),
            ..Whitelist::default()
        }),
        Provider::Binance | Provider::Coingecko => resolve(state).await,
    }
}
