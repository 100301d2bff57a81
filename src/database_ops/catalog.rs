use crate::catalog::{CatalogTable, RawRow};
use crate::database_ops::db::Db;
use crate::database_ops::rows::decode_rows;
use crate::database_ops::search::search_table;
use crate::store::CatalogStore;
use anyhow::Result;
use async_trait::async_trait;
use tracing::instrument;

/// Distinct non-null values cast to text, so enum and numeric facet columns
/// decode like plain strings.
pub fn distinct_sql(table: CatalogTable, column: &str) -> String {
    format!(
        "SELECT DISTINCT {column}::text FROM {table} WHERE {column} IS NOT NULL",
        table = table.table_name()
    )
}

#[async_trait]
impl CatalogStore for Db {
    #[instrument(skip(self))]
    async fn distinct_values(&self, table: CatalogTable, column: &str) -> Result<Vec<String>> {
        let values: Vec<String> = sqlx::query_scalar(&distinct_sql(table, column))
            .persistent(false)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    #[instrument(skip(self))]
    async fn count_rows(&self, table: CatalogTable) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
        let count: i64 = sqlx::query_scalar(&sql)
            .persistent(false)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn fetch_rows(&self, table: CatalogTable, columns: &[&str]) -> Result<Vec<RawRow>> {
        let sql = format!("SELECT {} FROM {}", columns.join(", "), table.table_name());
        let rows = sqlx::query(&sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await?;
        Ok(decode_rows(&rows))
    }

    async fn search_rows(
        &self,
        table: CatalogTable,
        query: &str,
        limit: i64,
    ) -> Result<Vec<RawRow>> {
        search_table(self, table, query, limit).await
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, bool>("SELECT true")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_reads_facets_as_text() {
        assert_eq!(
            distinct_sql(CatalogTable::Watches, "gender"),
            "SELECT DISTINCT gender::text FROM watches WHERE gender IS NOT NULL"
        );
    }
}
