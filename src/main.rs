use std::{str::FromStr, sync::Arc};

use tokio::{signal, sync::watch, task::JoinSet};
use tracing::{error, info, Level};

use price_oracle::{
    cache::MokaCache,
    configuration::{get_configuration, set_configuration, AppState, State},
    error::Error,
    handler::{aggregation_task, subscription},
    migration::run_migrations,
    provider::{DatabasePool, HTTP},
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    set_configuration()?;
    let config = get_configuration()?;

    let level = Level::from_str(&config.log_level).map_err(|e| {
        Error::ConfigurationError(format!("LOG_LEVEL: {}", e))
    })?;
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    run_migrations(&config.database_url).await?;

    let database = Arc::new(DatabasePool::new(&config).await?);
    let http = HTTP::new(config.clone())?;
    let cache = Arc::new(MokaCache::new(config.cache_max_capacity));

    let state = State::new(config, database.clone(), database, http, cache);
    let app_state = AppState::new(state);

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut workers = JoinSet::new();

    subscription::spawn_subscriptions(
        &app_state,
        subscription::sources(&app_state),
        &stop_rx,
        &mut workers,
    );
    aggregation_task::spawn_aggregator(&app_state, &stop_rx, &mut workers);

    let (server_handle, mut server) = server::server_task(&app_state)?;
    info!(
        host = %app_state.config.server_host,
        port = app_state.config.port,
        "price oracle started"
    );

    let finished = tokio::select! {
        _ = shutdown_signal() => {
            info!("shutdown requested");
            None
        },
        result = &mut server => Some(result),
    };

    let _ = stop_tx.send(true);
    server_handle.stop(true).await;

    let server_result = match finished {
        Some(result) => result,
        None => server.await,
    };

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => {},
            Ok(Err(e)) => error!(error = %e, "worker exited with error"),
            Err(e) => error!(error = %e, "worker panicked"),
        }
    }

    server_result??;
    info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
