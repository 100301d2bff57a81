// Postgres-backed storage (sqlx) plus the in-memory store.

pub mod accounts;
pub mod bootstrap;
pub mod catalog;
pub mod db;
pub mod memory;
pub mod rows;
pub mod search;
