use std::sync::Arc;

use anyhow::Context;

use stashpad_api::config;
use stashpad_api::jobs::{self, bootstrap::JobBootstrap};
use stashpad_api::store::{memory::MemoryStore, postgres::PgStore, Store};
use stashpad_api::{app, AppState};

// Process-lifetime guard for the maintenance job. Owning the flag here keeps
// a second pass through startup from scheduling the job twice.
static MAINTENANCE: JobBootstrap = JobBootstrap::new();

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Stashpad API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url, &config.database)
                .await
                .context("failed to connect to database")?;
            store
                .ensure_schema()
                .await
                .context("failed to prepare database schema")?;
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, falling back to in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let outcome = MAINTENANCE
        .bootstrap(config.runtime, config.jobs.maintenance_enabled, || {
            jobs::maintenance::start(store.clone(), &config.jobs)
        })
        .context("failed to start maintenance job")?;
    tracing::debug!("maintenance bootstrap outcome: {:?}", outcome);

    let app = app(AppState { store });

    // Allow tests or deployments to override port via env
    let port = std::env::var("STASHPAD_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Stashpad API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
