use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::config::StoreConfig;

/// Connects eagerly so a bad store URL or key fails at startup, not on the
/// first request.
pub async fn make_pool(store: &StoreConfig, max_connections: u32) -> anyhow::Result<PgPool> {
    let opts = PgConnectOptions::from_str(&store.url)
        .map_err(|e| anyhow::anyhow!("invalid store url: {e}"))?
        .password(&store.access_key);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections.clamp(1, 32))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(opts)
        .await?;

    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
