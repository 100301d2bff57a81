// Per-client rate limiting for everything under /api/.

use crate::limiter::{client_identity, Admission, RateLimiter};
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

pub const THROTTLED_PATH_PREFIX: &str = "/api/";

/// Rejects requests over the limiter's budget with `429`.
pub struct Throttle {
    limiter: Arc<RateLimiter>,
}

impl Throttle {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Throttle
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = ThrottleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ThrottleMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct ThrottleMiddleware<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

fn request_client(req: &ServiceRequest) -> String {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok());
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    client_identity(forwarded, peer.as_deref())
}

impl<S, B> Service<ServiceRequest> for ThrottleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !req.path().starts_with(THROTTLED_PATH_PREFIX) {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        let client = request_client(&req);
        match self.limiter.check(&client, Instant::now()) {
            Admission::Admitted => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Admission::Throttled => {
                warn!(client = %client, path = %req.path(), "rate limit exceeded");
                Box::pin(async move {
                    let response = HttpResponse::TooManyRequests()
                        .content_type("text/plain; charset=utf-8")
                        .body("Rate limit exceeded")
                        .map_into_right_body();
                    Ok(req.into_response(response))
                })
            }
        }
    }
}
