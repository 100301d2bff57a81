// Access logging, compression and CORS.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, Logger};

/// Storefront deployments always allowed to call the API.
pub const BUILTIN_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "https://localhost:3000",
    "https://plutus-frontend.onrender.com",
    "https://plutus-frontend.vercel.app",
    "https://plutus-frontend-git-main-lauz046.vercel.app",
    "https://plutus-frontend-git-develop-lauz046.vercel.app",
];

pub fn setup_middleware() -> (Logger, Compress) {
    let logger = Logger::default();
    let compress = Compress::default();
    (logger, compress)
}

/// Built-in origins plus the optional `CORS_ORIGIN` value, deduplicated.
pub fn allowed_origins(extra: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = BUILTIN_ORIGINS.iter().map(|o| o.to_string()).collect();
    if let Some(extra) = extra.map(str::trim).filter(|o| !o.is_empty()) {
        if !origins.iter().any(|o| o == extra) {
            origins.push(extra.to_string());
        }
    }
    origins
}

pub fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
            header::ORIGIN,
            header::ACCEPT,
        ])
        .supports_credentials()
        .max_age(86400);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_origin_is_appended_once() {
        assert_eq!(allowed_origins(None).len(), BUILTIN_ORIGINS.len());
        assert_eq!(allowed_origins(Some("  ")).len(), BUILTIN_ORIGINS.len());

        let origins = allowed_origins(Some("https://shop.example.com"));
        assert_eq!(origins.last().map(String::as_str), Some("https://shop.example.com"));

        let origins = allowed_origins(Some("http://localhost:3000"));
        assert_eq!(origins.len(), BUILTIN_ORIGINS.len());
    }
}
