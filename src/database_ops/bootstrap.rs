// Idempotent schema bootstrap run at startup: lookup indexes on the catalog
// tables plus the account/enquiry tables. Every statement is best-effort.

use crate::database_ops::db::Db;
use tracing::{info, warn};

pub const CATALOG_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sneakers_brand ON sneakers(LOWER(brand))",
    "CREATE INDEX IF NOT EXISTS idx_sneakers_brand_product_name ON sneakers(LOWER(brand), LOWER(product_name))",
    "CREATE INDEX IF NOT EXISTS idx_watches_brand ON watches(LOWER(brand))",
    "CREATE INDEX IF NOT EXISTS idx_perfumes_brand ON perfumes(LOWER(brand))",
    "CREATE INDEX IF NOT EXISTS idx_accessories_brand ON accessories(LOWER(brand))",
    "CREATE INDEX IF NOT EXISTS idx_apparel_brand ON apparel(LOWER(brand))",
];

pub const ACCOUNT_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        user_id VARCHAR(50) UNIQUE NOT NULL,
        full_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        phone VARCHAR(20),
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS enquiries (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(20),
        message TEXT NOT NULL,
        product_id VARCHAR(100),
        product_name VARCHAR(255),
        product_category VARCHAR(100),
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
];

pub const ACCOUNT_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE INDEX IF NOT EXISTS idx_users_user_id ON users(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_enquiries_email ON enquiries(email)",
    "CREATE INDEX IF NOT EXISTS idx_enquiries_product_id ON enquiries(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_enquiries_created_at ON enquiries(created_at)",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapSummary {
    pub applied: usize,
    pub failed: usize,
}

/// Run every bootstrap statement, tables before their indexes. Failures are
/// logged and counted, never returned.
pub async fn bootstrap_schema(db: &Db) -> BootstrapSummary {
    let mut summary = BootstrapSummary::default();
    let statements = CATALOG_INDEXES
        .iter()
        .chain(ACCOUNT_TABLES)
        .chain(ACCOUNT_INDEXES);
    for stmt in statements {
        // raw_sql: no prepared statements under PgBouncer
        match sqlx::raw_sql(stmt).execute(&db.pool).await {
            Ok(_) => summary.applied += 1,
            Err(e) => {
                warn!(error = %e, statement = %first_line(stmt), "bootstrap statement failed");
                summary.failed += 1;
            }
        }
    }
    info!(
        applied = summary.applied,
        failed = summary.failed,
        "schema bootstrap finished"
    );
    summary
}

fn first_line(stmt: &str) -> &str {
    stmt.lines().next().unwrap_or_default().trim()
}
