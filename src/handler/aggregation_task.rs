use std::collections::HashMap;

use chrono::Utc;
use futures::future::join_all;
use tokio::{sync::watch, task::JoinSet};
use tracing::{error, info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{Fiat_Price, Provider, Source_Price, Token_Price},
    types::Whitelist,
};

use super::{whitelist, worker::interval_worker};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregationReport {
    pub tokens: usize,
    pub fiats: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Picks the canonical price among one symbol's per-source rows.
///
/// Only rows with `updated_at >= cutoff` (unix milliseconds) count. The newest one wins; equal
/// timestamps go to the provider with the lower `priority()`. `None` when no
/// row is fresh.
pub fn reconcile(
    candidates: &[(Provider, Source_Price)],
    cutoff: i64,
) -> Option<(Provider, f64)> {
    candidates
        .iter()
        .filter(|(_, row)| row.updated_at >= cutoff)
        .min_by(|(a_provider, a), (b_provider, b)| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(a_provider.priority().cmp(&b_provider.priority()))
        })
        .map(|(provider, row)| (*provider, row.price))
}

/// One aggregation pass over the current whitelist. Symbols without a fresh
/// source row keep their canonical row untouched. Fiat codes come from
/// config, so fiats are still aggregated when the registry cannot be read;
/// the registry error is returned after that.
pub async fn aggregate(
    app_state: &AppState<State>,
) -> Result<AggregationReport, Error> {
    let registry = whitelist::resolve(app_state).await;
    let whitelist = match &registry {
        Ok(whitelist) => whitelist.clone(),
        Err(e) => {
            warn!(error = %e, "registry unavailable, aggregating fiats only");
            Whitelist {
                fiat_codes: whitelist::resolve_fiat_codes(app_state),
                ..Whitelist::default()
            }
        },
    };
    let cutoff = Utc::now().timestamp_millis()
        - app_state.config.price_freshness.as_millis() as i64;
    let mut report = AggregationReport::default();

    let token_symbols = whitelist.token_symbols();
    if !token_symbols.is_empty() {
        let candidates =
            collect_candidates(app_state, &Provider::TOKEN_SOURCES, &token_symbols)
                .await;
        let supplies =
            collect_supplies(app_state, &Provider::TOKEN_SOURCES, &token_symbols)
                .await;

        for symbol in token_symbols {
            let rows = candidates.get(&symbol).map(Vec::as_slice).unwrap_or(&[]);
            let Some((_, price)) = reconcile(rows, cutoff) else {
                report.unchanged += 1;
                continue;
            };

            let token = Token_Price {
                supply: supplies.get(&symbol).copied(),
                symbol,
                price,
            };

            match app_state.store.upsert_token(&token).await {
                Ok(()) => report.tokens += 1,
                Err(e) => {
                    error!(symbol = %token.symbol, error = %e, "canonical token upsert failed");
                    report.failed += 1;
                },
            }
        }
    }

    let fiat_symbols = whitelist.fiat_symbols();
    if !fiat_symbols.is_empty() {
        let candidates =
            collect_candidates(app_state, &Provider::FIAT_SOURCES, &fiat_symbols)
                .await;

        for symbol in fiat_symbols {
            let rows = candidates.get(&symbol).map(Vec::as_slice).unwrap_or(&[]);
            let Some((_, price)) = reconcile(rows, cutoff) else {
                report.unchanged += 1;
                continue;
            };

            let fiat = Fiat_Price { symbol, price };

            match app_state.store.upsert_fiat(&fiat).await {
                Ok(()) => report.fiats += 1,
                Err(e) => {
                    error!(symbol = %fiat.symbol, error = %e, "canonical fiat upsert failed");
                    report.failed += 1;
                },
            }
        }
    }

    info!(
        tokens = report.tokens,
        fiats = report.fiats,
        unchanged = report.unchanged,
        failed = report.failed,
        "aggregation finished"
    );

    registry?;

    Ok(report)
}

/// Per-source rows grouped by symbol, the tables read concurrently. A
/// provider whose table cannot be read is left out of this pass.
async fn collect_candidates(
    app_state: &AppState<State>,
    providers: &[Provider],
    symbols: &[String],
) -> HashMap<String, Vec<(Provider, Source_Price)>> {
    let mut candidates: HashMap<String, Vec<(Provider, Source_Price)>> =
        HashMap::new();

    let reads = join_all(providers.iter().map(|provider| async move {
        let rows = app_state.store.get_source_prices(*provider, symbols).await;
        (*provider, rows)
    }))
    .await;

    for (provider, rows) in reads {
        match rows {
            Ok(rows) => {
                for row in rows {
                    candidates
                        .entry(row.symbol.clone())
                        .or_default()
                        .push((provider, row));
                }
            },
            Err(e) => {
                warn!(%provider, error = %e, "could not read source prices");
            },
        }
    }

    candidates
}

async fn collect_supplies(
    app_state: &AppState<State>,
    providers: &[Provider],
    symbols: &[String],
) -> HashMap<String, f64> {
    let mut supplies = HashMap::new();

    for provider in providers.iter().filter(|p| p.supply_table().is_some()) {
        match app_state.store.get_source_supplies(*provider, symbols).await {
            Ok(rows) => {
                for row in rows {
                    supplies.entry(row.symbol).or_insert(row.supply);
                }
            },
            Err(e) => {
                warn!(%provider, error = %e, "could not read source supplies");
            },
        }
    }

    supplies
}

pub fn spawn_aggregator(
    app_state: &AppState<State>,
    stop: &watch::Receiver<bool>,
    tasks: &mut JoinSet<Result<(), Error>>,
) {
    let app = app_state.clone();
    let interval = app_state.config.aggregation_interval.clone();

    tasks.spawn(interval_worker(
        String::from("aggregator"),
        interval,
        stop.clone(),
        move || {
            let app = app.clone();
            async move {
                let report = aggregate(&app).await?;
                Ok::<usize, Error>(report.tokens + report.fiats)
            }
        },
    ));
}
