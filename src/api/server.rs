// API server implementation using actix-web

use crate::accounts::DEFAULT_BCRYPT_COST;
use crate::api::handlers::PasswordPolicy;
use crate::api::throttle::Throttle;
use crate::api::{middleware, routes};
use crate::catalog::CatalogService;
use crate::limiter::RateLimiter;
use crate::store::{AccountStore, CatalogStore};
use crate::util::env::{env_opt, env_parse};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 8090;

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub bcrypt_cost: u32,
}

impl ApiServer {
    /// Create server from environment variables
    pub fn from_env() -> Result<Self> {
        crate::util::env::init_env();

        let host = env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match env_opt("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = middleware::allowed_origins(env_opt("CORS_ORIGIN").as_deref());
        let bcrypt_cost = env_parse("BCRYPT_COST", DEFAULT_BCRYPT_COST);

        Ok(Self {
            host,
            port,
            allowed_origins,
            bcrypt_cost,
        })
    }

    /// Start the HTTP server
    pub async fn run(
        self,
        catalog: Arc<dyn CatalogStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            origins = self.allowed_origins.len(),
            "Starting catalog API server"
        );

        let catalog_data = web::Data::new(CatalogService::new(catalog));
        let accounts_data: web::Data<dyn AccountStore> = web::Data::from(accounts);
        let policy = web::Data::new(PasswordPolicy {
            bcrypt_cost: self.bcrypt_cost,
        });
        let limiter = Arc::new(RateLimiter::default());
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);

            App::new()
                .app_data(catalog_data.clone())
                .app_data(accounts_data.clone())
                .app_data(policy.clone())
                .wrap(Throttle::new(limiter.clone()))
                .wrap(cors)
                .wrap(compress)
                .wrap(logger)
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
