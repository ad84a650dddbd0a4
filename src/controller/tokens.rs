use std::time::Duration;

use actix_web::{post, web, Responder, Result};
use tracing::debug;

use crate::{
    cache_keys,
    configuration::{AppState, State},
    error::Error,
    handler::whitelist,
    helpers::{
        build_select_cache_key, cached_fetch, token_symbol, validate_selection,
    },
    model::Token_Price,
    types::{ApiResponse, SelectTokens},
};

#[post("/tokens")]
async fn index(
    state: web::Data<AppState<State>>,
    body: web::Bytes,
) -> Result<impl Responder, Error> {
    let request: SelectTokens =
        serde_json::from_slice(&body).unwrap_or_default();
    let data = select_tokens(state.get_ref(), request.tokens).await?;
    Ok(web::Json(ApiResponse::ok(data)))
}

pub async fn select_tokens(
    state: &AppState<State>,
    requested: Option<Vec<String>>,
) -> Result<Vec<Token_Price>, Error> {
    let allowed: Vec<String> = whitelist::resolve_token_tickers(state)
        .await?
        .iter()
        .map(|ticker| token_symbol(ticker))
        .collect();

    let symbols = validate_selection(requested, &allowed).map_err(|e| {
        debug!(error = %e, "rejected token selection");
        e
    })?;

    let key = build_select_cache_key(cache_keys::TOKENS, &symbols)?;
    let ttl = Duration::from_secs(state.config.cache_ttl_select);

    cached_fetch(state.cache.as_ref(), &key, ttl, || async {
        state.store.get_tokens(&symbols).await
    })
    .await
}
