use std::future::Future;

use tokio::{sync::watch, time};
use tracing::{debug, error, info};

use crate::{error::Error, helpers::parse_interval};

/// Runs `cycle` every `interval` until `stop` flips to `true` or its sender
/// goes away.
///
/// A failed cycle is logged and retried on the next tick. The stop signal is
/// checked before every cycle and interrupts the sleep, never a running
/// cycle. An interval that does not parse ends the worker with
/// `ConfigurationError`.
pub async fn interval_worker<F, Fut>(
    name: String,
    interval: String,
    mut stop: watch::Receiver<bool>,
    mut cycle: F,
) -> Result<(), Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<usize, Error>>,
{
    let period = match parse_interval(&interval) {
        Ok(period) => period,
        Err(e) => {
            error!(worker = %name, error = %e, "invalid interval, worker terminated");
            return Err(e);
        },
    };

    info!(worker = %name, ?period, "worker started");

    loop {
        if *stop.borrow() {
            break;
        }

        match cycle().await {
            Ok(count) => debug!(worker = %name, count, "cycle finished"),
            Err(e) => error!(worker = %name, error = %e, "cycle failed"),
        }

        tokio::select! {
            _ = time::sleep(period) => {},
            changed = stop.changed() => {
                if changed.is_err() {
                    break;
                }
            },
        }
    }

    info!(worker = %name, "worker stopped");

    Ok(())
}
