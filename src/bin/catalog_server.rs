// HTTP server binary for the storefront catalog API

use anyhow::{bail, Result};
use plutus_catalog::api::ApiServer;
use plutus_catalog::database_ops::bootstrap::bootstrap_schema;
use plutus_catalog::database_ops::db::Db;
use plutus_catalog::database_ops::memory::MemoryStore;
use plutus_catalog::store::{AccountStore, CatalogStore};
use plutus_catalog::util::env as env_util;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    tracing::info!("Initializing catalog API server");

    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();

    // Load configuration from environment
    let server = ApiServer::from_env()?;

    let backend = env_util::env_opt("STORE_BACKEND").unwrap_or_else(|| "postgres".to_string());
    let (catalog, accounts): (Arc<dyn CatalogStore>, Arc<dyn AccountStore>) =
        match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => {
                tracing::warn!("using in-memory store; data is not persisted");
                let store = Arc::new(MemoryStore::default());
                (store.clone(), store)
            }
            "postgres" => {
                let database_url = env_util::db_url()?;
                let max_connections: u32 = env_util::env_parse("DB_MAX_CONNS", 25u32);
                let db = Db::connect(&database_url, max_connections).await?;
                tracing::info!(max_connections, "Database connected successfully");

                if env_util::env_flag("SCHEMA_BOOTSTRAP", true) {
                    bootstrap_schema(&db).await;
                }
                let db = Arc::new(db);
                (db.clone(), db)
            }
            other => bail!("unknown STORE_BACKEND {other:?} (expected postgres or memory)"),
        };

    // Start HTTP server
    server.run(catalog, accounts).await?;

    Ok(())
}
