//! Database connection pool

use rbac_shared::config::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

/// Connect the pool. Detached reads made while a transaction is open take
/// a second connection, so `max_connections` must be at least 2.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections.max(2))
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&settings.url)
        .await?;

    info!(
        "Database pool ready (max {} connections)",
        settings.max_connections.max(2)
    );
    Ok(pool)
}
