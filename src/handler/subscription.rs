use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinSet, time};
use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Provider,
    provider::{Binance, Coingecko, Fixer, PriceObservation, PriceSource},
};

use super::{whitelist, worker::interval_worker};

/// The three production sources sharing the state's HTTP client.
pub fn sources(app_state: &AppState<State>) -> Vec<Arc<dyn PriceSource>> {
    vec![
        Arc::new(Binance::new(app_state.http.clone())),
        Arc::new(Coingecko::new(app_state.http.clone())),
        Arc::new(Fixer::new(app_state.http.clone())),
    ]
}

/// One subscription cycle: resolve the whitelist, then for every request
/// the source splits it into, fetch and upsert its observations in order.
/// Paced providers sleep between requests and between writes, so each
/// request is stored before the next one is sent. A failed write is logged
/// and the next symbol is still written; a failed request ends the cycle
/// with the earlier requests already stored. Returns the number of symbols
/// stored.
pub async fn run_cycle(
    app_state: &AppState<State>,
    source: &dyn PriceSource,
) -> Result<usize, Error> {
    let provider = source.provider();
    let whitelist = whitelist::resolve_for(provider, app_state).await?;
    let requests = source.requests(&whitelist)?;

    let pause = Duration::from_millis(app_state.config.rate_limit_pause_ms);
    let paced = provider.paced() && !pause.is_zero();
    let mut fetched = 0;
    let mut written = 0;

    for (index, request) in requests.iter().enumerate() {
        if index > 0 && paced {
            time::sleep(pause).await;
        }

        let observations = match source.fetch(request).await {
            Ok(observations) => observations,
            Err(e) => {
                if written > 0 {
                    warn!(%provider, written, "cycle aborted after partial progress");
                }
                return Err(e);
            },
        };
        fetched += observations.len();

        for (position, observation) in observations.iter().enumerate() {
            if position > 0 && paced {
                time::sleep(pause).await;
            }

            match store_observation(app_state, provider, observation).await {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(%provider, symbol = %observation.symbol, error = %e, "upsert failed");
                },
            }
        }
    }

    info!(%provider, fetched, written, "subscription cycle finished");

    Ok(written)
}

async fn store_observation(
    app_state: &AppState<State>,
    provider: Provider,
    observation: &PriceObservation,
) -> Result<(), Error> {
    if let Some(supply) = observation.supply {
        app_state
            .store
            .upsert_supply(provider, &observation.symbol, supply)
            .await?;
    }

    app_state
        .store
        .upsert_price(
            provider,
            &observation.symbol,
            observation.price,
            observation.observed_at,
        )
        .await
}

/// Spawns one long-lived worker per source into `tasks`.
pub fn spawn_subscriptions(
    app_state: &AppState<State>,
    sources: Vec<Arc<dyn PriceSource>>,
    stop: &watch::Receiver<bool>,
    tasks: &mut JoinSet<Result<(), Error>>,
) {
    for source in sources {
        let app = app_state.clone();
        let stop = stop.clone();
        let interval = app_state.config.subscription_interval.clone();
        let name = format!("subscription:{}", source.provider());

        tasks.spawn(interval_worker(name, interval, stop, move || {
            let app = app.clone();
            let source = source.clone();
            async move { run_cycle(&app, source.as_ref()).await }
        }));
    }
}
