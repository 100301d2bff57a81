// HTTP surface of the catalog service: menu, search, accounts and health.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod throttle;

pub use server::ApiServer;
