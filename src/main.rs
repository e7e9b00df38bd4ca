use std::sync::Arc;
use std::time::Duration;

use mixer_api::{
    api::{create_router, AppState},
    config::{Config, LogFormat, StoreSettings},
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle},
    services::{
        stores::{
            CachedCatalogStore, CatalogStore, ContentStore, HistoryStore, MemoryStore, PgStore,
            RestStore,
        },
        HistoryDispatcher, HistoryWriterHandle, RecommendationEngine,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Background writers to flush on shutdown
struct Writers {
    history: HistoryWriterHandle,
    cache: Option<CacheWriterHandle>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(config.log_format);

    let (state, writers) = build_state(&config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        backend = ?config.store_backend,
        policy = ?config.selection_policy,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    writers.history.shutdown().await;
    if let Some(cache) = writers.cache {
        cache.shutdown().await;
    }

    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mixer_api=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init(),
    }
}

type Stores = (
    Arc<dyn CatalogStore>,
    Arc<dyn ContentStore>,
    Arc<dyn HistoryStore>,
);

/// Opens the configured backend behind all three store traits
async fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    let stores: Stores = match config.store_settings()? {
        StoreSettings::Memory { seed_path } => {
            let store = match seed_path {
                Some(path) => MemoryStore::from_seed_file(path).await?,
                None => MemoryStore::new(),
            };
            (Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store))
        }
        StoreSettings::Postgres { database_url } => {
            let store = PgStore::new(create_pool(database_url).await?);
            (Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store))
        }
        StoreSettings::Rest { url, api_key } => {
            let store = RestStore::new(url, api_key);
            (Arc::new(store.clone()), Arc::new(store.clone()), Arc::new(store))
        }
    };
    Ok(stores)
}

/// Wires the configured backend into the application state
async fn build_state(config: &Config) -> anyhow::Result<(AppState, Writers)> {
    let (catalog, content, history) = open_stores(config).await?;

    let (catalog, cache_handle) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(create_redis_client(redis_url)?).await;
            tracing::info!(ttl_secs = config.catalog_cache_ttl_secs, "Catalog cache enabled");
            let cached: Arc<dyn CatalogStore> = Arc::new(CachedCatalogStore::new(
                catalog,
                cache,
                config.catalog_cache_ttl_secs,
            ));
            (cached, Some(handle))
        }
        None => (catalog, None),
    };

    let (dispatcher, history_handle) = HistoryDispatcher::spawn(history);
    let state = AppState::new(
        catalog,
        content,
        Arc::new(dispatcher),
        RecommendationEngine::new(config.selection_policy),
    )
    .with_session_ttl(Duration::from_secs(config.session_ttl_secs));

    Ok((
        state,
        Writers {
            history: history_handle,
            cache: cache_handle,
        },
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
