use anyhow::Context;
use jobscout::api;
use jobscout::config::{Config, StoreMode};
use jobscout::db;
use jobscout::jobs::{JobFeed, JobsRepo};
use jobscout::upstream::UpstreamClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobscout=debug,sqlx=warn,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Misconfiguration is fatal; there is no degraded mode.
    let cfg = Config::from_env().context("failed to load configuration")?;

    tracing::info!(
        addr = %cfg.listen_addr,
        mode = cfg.mode.as_str(),
        upstream = %cfg.upstream_url,
        migrate_on_startup = cfg.migrate_on_startup,
        "jobscout starting"
    );

    let upstream = UpstreamClient::new(&cfg.upstream_url, &cfg.user_agent)?;

    let feed = match (cfg.mode, &cfg.store) {
        (StoreMode::Persistent, Some(store)) => {
            tracing::info!(store = ?store, "connecting to store");
            let pool = db::make_pool(store, cfg.db_max_connections)
                .await
                .context("failed to initialize store client")?;
            if cfg.migrate_on_startup {
                db::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;
                tracing::info!("migrations complete");
            }
            JobFeed::persistent(upstream, JobsRepo::new(pool))
        }
        (StoreMode::Persistent, None) => anyhow::bail!("persistent mode without store settings"),
        (StoreMode::Relay, _) => JobFeed::relay(upstream),
    };

    let app = api::router(api::ApiState { feed });

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    tracing::info!("listening on http://{}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("jobscout stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
