// HTTP request handlers for API endpoints

use crate::accounts::{self, AccountError, UserProfile};
use crate::api::models::*;
use crate::catalog::CatalogService;
use crate::store::AccountStore;
use actix_web::{http::StatusCode, web, HttpResponse};
use bytes::Bytes;
use std::time::Instant;
use tracing::{error, info};

/// bcrypt cost used for new accounts.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub bcrypt_cost: u32,
}

fn json_bytes(body: Bytes) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(body)
}

fn plain(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(message.to_string())
}

/// Health check endpoint
pub async fn health_check(catalog: web::Data<CatalogService>) -> HttpResponse {
    let database = if catalog.store_reachable().await {
        "connected"
    } else {
        "disconnected"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn menu(catalog: web::Data<CatalogService>) -> HttpResponse {
    match catalog.menu_json(Instant::now()).await {
        Ok(body) => json_bytes(body),
        Err(e) => {
            error!(error = %e, "menu serialization failed");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "Failed to marshal menu")
        }
    }
}

pub async fn search(
    catalog: web::Data<CatalogService>,
    params: web::Query<SearchParams>,
) -> HttpResponse {
    match catalog
        .search_json(&params.q, &params.category, Instant::now())
        .await
    {
        Ok(body) => json_bytes(body),
        Err(e) => {
            error!(error = %e, "search serialization failed");
            plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to marshal search results",
            )
        }
    }
}

pub async fn search_counts(catalog: web::Data<CatalogService>) -> HttpResponse {
    HttpResponse::Ok().json(catalog.category_counts().await)
}

pub async fn register(
    store: web::Data<dyn AccountStore>,
    policy: web::Data<PasswordPolicy>,
    payload: web::Json<RegisterRequest>,
) -> HttpResponse {
    let registration = payload.into_inner().into();
    match accounts::register(store.get_ref(), registration, policy.bcrypt_cost).await {
        Ok(user) => {
            info!(user_id = %user.user_id, "account created");
            HttpResponse::Ok().json(AuthResponse::ok(
                "Account created successfully",
                Some(UserProfile::from(&user)),
            ))
        }
        Err(AccountError::AlreadyRegistered) => HttpResponse::BadRequest()
            .json(AuthResponse::rejected(AccountError::AlreadyRegistered.to_string())),
        Err(AccountError::MissingFields(msg)) => plain(StatusCode::BAD_REQUEST, msg),
        Err(AccountError::Hashing) => plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process password",
        ),
        Err(_) => plain(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create account",
        ),
    }
}

pub async fn login(
    store: web::Data<dyn AccountStore>,
    payload: web::Json<LoginRequest>,
) -> HttpResponse {
    match accounts::login(store.get_ref(), &payload.email, &payload.password).await {
        Ok(user) => HttpResponse::Ok().json(AuthResponse::ok(
            "Successfully signed in",
            Some(UserProfile::from(&user)),
        )),
        Err(AccountError::MissingFields(msg)) => plain(StatusCode::BAD_REQUEST, msg),
        Err(_) => HttpResponse::Unauthorized().json(AuthResponse::rejected(
            AccountError::InvalidCredentials.to_string(),
        )),
    }
}

pub async fn enquiry(
    store: web::Data<dyn AccountStore>,
    payload: web::Json<EnquiryRequest>,
) -> HttpResponse {
    match accounts::submit_enquiry(store.get_ref(), payload.into_inner().into()).await {
        Ok(()) => HttpResponse::Ok().json(AuthResponse::ok("Enquiry submitted successfully", None)),
        Err(AccountError::MissingFields(msg)) => plain(StatusCode::BAD_REQUEST, msg),
        Err(_) => plain(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save enquiry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::configure_routes;
    use crate::api::throttle::Throttle;
    use crate::catalog::{CatalogTable, RawValue};
    use crate::database_ops::memory::MemoryStore;
    use crate::limiter::RateLimiter;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    macro_rules! test_app {
        ($store:expr) => {{
            let store: Arc<MemoryStore> = $store;
            let accounts: Arc<dyn AccountStore> = store.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(CatalogService::new(store.clone())))
                    .app_data(web::Data::from(accounts))
                    .app_data(web::Data::new(PasswordPolicy { bcrypt_cost: 4 }))
                    .wrap(Throttle::new(Arc::new(RateLimiter::default())))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    fn seeded() -> Arc<MemoryStore> {
        let store = MemoryStore::default();
        store.push_row(
            CatalogTable::Sneakers,
            vec![
                ("id".into(), RawValue::Int(7)),
                ("brand".into(), RawValue::Text("Nike".into())),
                ("product_name".into(), RawValue::Text("Air Max 90".into())),
                ("images".into(), RawValue::Text("{a.jpg, b.jpg}".into())),
                ("product_link".into(), RawValue::Text("https://x/1".into())),
            ],
        );
        store.push_row(
            CatalogTable::Watches,
            vec![
                ("id".into(), RawValue::Int(3)),
                ("brand".into(), RawValue::Text("Omega".into())),
                ("name".into(), RawValue::Text("Speedmaster".into())),
                ("images".into(), RawValue::Null),
                ("link".into(), RawValue::Null),
            ],
        );
        Arc::new(store)
    }

    fn from_client(uri: &str, client: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(("X-Forwarded-For", client.to_string()))
    }

    #[actix_web::test]
    async fn menu_lists_every_section() {
        let app = test_app!(seeded());
        let req = from_client("/api/menu", "1.1.1.1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        for key in ["sneaker", "apparel", "watch", "perfume", "accessories"] {
            assert!(body[key]["brands"].is_array(), "{key}");
            assert!(body[key]["products"].is_array(), "{key}");
        }
        assert_eq!(body["sneaker"]["brands"], json!(["Nike"]));
    }

    #[actix_web::test]
    async fn search_returns_projected_products() {
        let app = test_app!(seeded());
        let req = from_client("/api/search?q=air&category=sneakers", "1.1.1.1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["images"], json!(["a.jpg", "b.jpg"]));
        assert!(body.get("categoryCounts").is_none());
    }

    #[actix_web::test]
    async fn empty_search_returns_default_view() {
        let app = test_app!(seeded());
        let req = from_client("/api/search", "1.1.1.1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["products"], json!([]));
        assert_eq!(body["categoryCounts"]["sneakers"], 1);
        assert_eq!(body["categoryCounts"]["watches"], 1);
        assert_eq!(body["categoryCounts"]["perfumes"], 0);
        assert_eq!(body["categoryCounts"].as_object().unwrap().len(), 5);
    }

    #[actix_web::test]
    async fn store_outage_still_answers_ok() {
        let store = seeded();
        store.set_failing(true);
        let app = test_app!(store);

        let resp = test::call_service(&app, from_client("/api/menu", "2.2.2.2").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["watch"]["brands"], json!([]));
        assert_eq!(body["watch"]["products"], json!([]));

        let req = from_client("/api/search?q=air", "2.2.2.2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["products"], json!([]));

        let req = from_client("/api/search/counts", "2.2.2.2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sneakers"], 0);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "disconnected");
    }

    #[actix_web::test]
    async fn counts_follow_search_order() {
        let app = test_app!(seeded());
        let req = from_client("/api/search/counts", "1.1.1.1").to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            r#"{"sneakers":1,"apparel":0,"accessories":0,"perfumes":0,"watches":1}"#
        );
    }

    #[actix_web::test]
    async fn hundred_and_first_request_is_throttled() {
        let app = test_app!(seeded());
        for i in 0..100 {
            let req = from_client("/api/search/counts", "9.9.9.9").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "request {i}");
        }

        let resp =
            test::call_service(&app, from_client("/api/menu", "9.9.9.9").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(test::read_body(resp).await, "Rate limit exceeded");

        // other clients and the health check are unaffected
        let resp =
            test::call_service(&app, from_client("/api/menu", "8.8.8.8").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = test::call_service(&app, from_client("/health", "9.9.9.9").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn wrong_method_is_rejected() {
        let app = test_app!(seeded());
        let req = test::TestRequest::post().uri("/api/menu").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::get().uri("/api/auth/login").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::delete().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn register_then_login() {
        let app = test_app!(Arc::new(MemoryStore::default()));

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "555",
                "password": "engine"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Account created successfully");
        assert_eq!(body["user"]["fullName"], "Ada Lovelace");
        assert!(body["user"]["id"].as_str().unwrap().starts_with("user_"));

        let again = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"email": "ada@example.com", "password": "other"}))
            .to_request();
        let resp = test::call_service(&app, again).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "You are already registered with this email.");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "engine"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Successfully signed in");
        assert_eq!(body["user"]["email"], "ada@example.com");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "wrong"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[actix_web::test]
    async fn malformed_and_incomplete_bodies_are_bad_requests() {
        let app = test_app!(Arc::new(MemoryStore::default()));

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, "Invalid request body");

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"email": "ada@example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, "Email and password are required");
    }

    #[actix_web::test]
    async fn enquiry_is_stored() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/enquiry")
            .set_json(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "message": "Is this in stock?",
                "productId": "42",
                "productCategory": "watches"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true, "message": "Enquiry submitted successfully"}));

        let saved = store.enquiries();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].product_id, "42");
        assert_eq!(saved[0].product_name, "");

        let req = test::TestRequest::post()
            .uri("/api/enquiry")
            .set_json(json!({"name": "Grace"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
