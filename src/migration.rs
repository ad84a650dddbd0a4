//! Schema migrations embedded at compile time and applied on startup.
//! Applied versions are tracked in `refinery_schema_history`.

use refinery::embed_migrations;
use tokio_postgres::NoTls;

use crate::error::Error;

embed_migrations!("migrations");

/// Applies every pending migration in version order. Each migration runs in
/// its own transaction.
pub async fn run_migrations(database_url: &str) -> Result<(), Error> {
    tracing::info!("Running database migrations...");

    let config: tokio_postgres::Config = database_url.parse().map_err(|e| {
        Error::ConfigurationError(format!("Invalid database URL: {}", e))
    })?;

    let (mut client, connection) =
        config.connect(NoTls).await.map_err(|e| {
            Error::ConfigurationError(format!(
                "Failed to connect for migrations: {}",
                e
            ))
        })?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Migration connection error: {}", e);
        }
    });

    let report = migrations::runner()
        .run_async(&mut client)
        .await
        .map_err(|e| {
            Error::ConfigurationError(format!("Migration failed: {}", e))
        })?;

    let applied = report.applied_migrations();
    if applied.is_empty() {
        tracing::info!("Schema is up to date");
    } else {
        for migration in applied {
            tracing::info!(
                "Applied migration: V{:03}__{}",
                migration.version(),
                migration.name()
            );
        }
    }

    Ok(())
}
