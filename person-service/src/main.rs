use std::sync::Arc;

use person_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    #[cfg(feature = "database")]
    if let Some(db) = config.database.clone() {
        let pool = person_service::database::create_pool(&db).await?;
        let store = PgPersonStore::new(pool);
        store.migrate().await?;
        tracing::info!("Using PostgreSQL person store");
        return run(config, Arc::new(store)).await;
    }

    #[cfg(not(feature = "database"))]
    if config.database.is_some() {
        tracing::warn!("[database] is configured but the `database` feature is disabled");
    }

    tracing::info!("Using in-memory person store");
    run(config, Arc::new(InMemoryPersonStore::new())).await
}

async fn run<S: PersonStore>(config: Config, store: Arc<S>) -> Result<()> {
    let seeded = preload(store.as_ref(), &config.people).await?;
    if seeded > 0 {
        tracing::info!(seeded, "Preloaded sample people");
    }

    let app = router(AppState::new(config.clone(), store));
    Server::new(config).serve(app).await
}
