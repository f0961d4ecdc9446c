use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use common::StorageBackend;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::S3ObjectStore;
use tracing::{Level, info};

use cattery_server::config::AppConfig;
use cattery_server::state::AppState;
use cattery_server::{build_router, database, seed};

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    let store: Arc<dyn ObjectStore> = match storage.backend {
        StorageBackend::Filesystem => Arc::new(
            FilesystemObjectStore::new(
                PathBuf::from(&storage.root),
                storage.public_base_url.clone(),
                storage.bucket.clone(),
            )
            .await
            .context("Failed to initialize filesystem storage")?,
        ),
        StorageBackend::S3 => Arc::new(
            S3ObjectStore::new(storage).context("Failed to initialize S3 storage")?,
        ),
    };
    info!(backend = ?storage.backend, bucket = %storage.bucket, "Object storage ready");
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;
    seed::seed_blood_types(&db).await?;

    let store = build_store(&config).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        store,
        config: Arc::new(config),
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
