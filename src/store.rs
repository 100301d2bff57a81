// Storage seams consumed by the catalog read paths and the account endpoints.
// `database_ops::db::Db` implements both against Postgres; `database_ops::memory`
// holds an in-process implementation for tests and local runs.

use crate::accounts::{NewEnquiry, UserRecord};
use crate::catalog::{CatalogTable, RawRow};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// `SELECT DISTINCT column` with nulls excluded, in store order.
    async fn distinct_values(&self, table: CatalogTable, column: &str) -> Result<Vec<String>>;

    async fn count_rows(&self, table: CatalogTable) -> Result<i64>;

    /// Every row of `table` restricted to `columns`, unordered.
    async fn fetch_rows(&self, table: CatalogTable, columns: &[&str]) -> Result<Vec<RawRow>>;

    /// Case-insensitive substring match of `query` against brand and the table's
    /// display-name column, returning `search_columns()` for at most `limit` rows.
    async fn search_rows(&self, table: CatalogTable, query: &str, limit: i64)
        -> Result<Vec<RawRow>>;

    async fn ping(&self) -> bool;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn insert_user(&self, user: &UserRecord) -> Result<()>;

    async fn insert_enquiry(&self, enquiry: &NewEnquiry) -> Result<()>;
}
