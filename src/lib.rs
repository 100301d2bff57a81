//! Read-acceleration layer for a storefront catalog: cached menu and search
//! endpoints over five product tables, a per-client rate limiter, and minimal
//! account and enquiry capture.

pub mod accounts;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod database_ops;
pub mod limiter;
pub mod store;

pub mod util {
    pub mod env;
}
