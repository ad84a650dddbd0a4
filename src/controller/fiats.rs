use std::time::Duration;

use actix_web::{post, web, Responder, Result};
use tracing::debug;

use crate::{
    cache_keys,
    configuration::{AppState, State},
    error::Error,
    handler::whitelist,
    helpers::{
        build_select_cache_key, cached_fetch, fiat_symbol, validate_selection,
    },
    model::Fiat_Price,
    types::{ApiResponse, SelectFiats},
};

#[post("/fiats")]
async fn index(
    state: web::Data<AppState<State>>,
    body: web::Bytes,
) -> Result<impl Responder, Error> {
    let request: SelectFiats = serde_json::from_slice(&body).unwrap_or_default();
    let data = select_fiats(state.get_ref(), request.fiats).await?;
    Ok(web::Json(ApiResponse::ok(data)))
}

pub async fn select_fiats(
    state: &AppState<State>,
    requested: Option<Vec<String>>,
) -> Result<Vec<Fiat_Price>, Error> {
    let allowed: Vec<String> = whitelist::resolve_fiat_codes(state)
        .iter()
        .map(|code| fiat_symbol(code))
        .collect();

    let symbols = validate_selection(requested, &allowed).map_err(|e| {
        debug!(error = %e, "rejected fiat selection");
        e
    })?;

    let key = build_select_cache_key(cache_keys::FIATS, &symbols)?;
    let ttl = Duration::from_secs(state.config.cache_ttl_select);

    cached_fetch(state.cache.as_ref(), &key, ttl, || async {
        state.store.get_fiats(&symbols).await
    })
    .await
}
