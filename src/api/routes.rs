// API route configuration

use crate::api::handlers;
use actix_web::{error::InternalError, web, HttpResponse};

/// Malformed JSON bodies answer `400 Invalid request body`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "rejected request body");
        InternalError::from_response(
            err,
            HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body("Invalid request body"),
        )
        .into()
    })
}

/// Each path is its own resource so a wrong method answers `405`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Health check (not rate limited)
        .service(web::resource("/health").route(web::get().to(handlers::health_check)))
        .service(
            web::scope("/api")
                // Catalog reads
                .service(web::resource("/menu").route(web::get().to(handlers::menu)))
                .service(web::resource("/search").route(web::get().to(handlers::search)))
                .service(
                    web::resource("/search/counts").route(web::get().to(handlers::search_counts)),
                )
                // Accounts
                .service(
                    web::resource("/auth/register").route(web::post().to(handlers::register)),
                )
                .service(web::resource("/auth/login").route(web::post().to(handlers::login)))
                .service(web::resource("/enquiry").route(web::post().to(handlers::enquiry))),
        );
}
