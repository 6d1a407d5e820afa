use dotenvy::dotenv;
use ecomart::{
    api::{self, AppState},
    config::{
        catalog,
        database::{create_connection, create_tables},
        server::{ServerConfig, StorageBackend},
    },
    errors::Result,
    storage::{self, DatabaseStorage, MemoryStorage, Storage},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Server settings
    let config = ServerConfig::from_env()
        .inspect_err(|e| error!("Invalid server configuration: {}", e))?;
    info!(bind_addr = %config.bind_addr, demo_user_id = config.demo_user_id, "Configuration loaded");

    // 4. Storage
    let storage: Arc<dyn Storage> = match &config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::Database(url) => {
            let db = create_connection(url)
                .await
                .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
            create_tables(&db)
                .await
                .inspect(|_| info!("Database initialized successfully."))?;
            Arc::new(DatabaseStorage::new(db))
        }
    };

    // 5. Seed the catalog on first run
    if config.catalog_path.exists() {
        let seed = catalog::load_catalog(&config.catalog_path)?;
        storage::seed::seed_catalog(storage.as_ref(), &seed)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
    } else {
        warn!(
            path = %config.catalog_path.display(),
            "Seed catalog not found; starting with an empty store"
        );
    }

    // 6. Serve
    let app = api::router(AppState::new(storage, config.demo_user_id));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("EcoMart API listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
