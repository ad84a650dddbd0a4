use std::time::Duration;

use actix_web::{get, web, Responder, Result};

use crate::{
    cache_keys,
    configuration::{AppState, State},
    error::Error,
    handler::whitelist,
    helpers::cached_fetch,
    types::{AllPriceResponse, ApiResponse},
};

#[get("/prices")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let data = all_prices(state.get_ref()).await?;
    Ok(web::Json(ApiResponse::ok(data)))
}

/// Canonical prices of every whitelisted token and fiat, served from the
/// `prices` cache entry when present.
pub async fn all_prices(
    state: &AppState<State>,
) -> Result<AllPriceResponse, Error> {
    let ttl = Duration::from_secs(state.config.cache_ttl_prices);

    cached_fetch(state.cache.as_ref(), cache_keys::PRICES, ttl, || async {
        let whitelist = whitelist::resolve(state).await?;
        let tokens = state.store.get_tokens(&whitelist.token_symbols()).await?;
        let fiats = state.store.get_fiats(&whitelist.fiat_symbols()).await?;

        Ok(AllPriceResponse { tokens, fiats })
    })
    .await
}
