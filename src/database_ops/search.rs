use crate::catalog::{CatalogTable, RawRow};
use crate::database_ops::db::Db;
use crate::database_ops::rows::decode_rows;
use anyhow::Result;
use tracing::instrument;

/// Escape LIKE metacharacters so user text matches literally.
pub fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// SQL for a per-table search. Identifiers come from `CatalogTable` only.
pub fn search_sql(table: CatalogTable) -> String {
    format!(
        "SELECT {cols} FROM {table} WHERE brand ILIKE $1 OR {name} ILIKE $1 LIMIT $2",
        cols = table.search_columns().join(", "),
        table = table.table_name(),
        name = table.name_column(),
    )
}

#[instrument(skip(db))]
pub async fn search_table(
    db: &Db,
    table: CatalogTable,
    q: &str,
    limit: i64,
) -> Result<Vec<RawRow>> {
    let rows = sqlx::query(&search_sql(table))
        .persistent(false)
        .bind(like_pattern(q))
        .bind(limit)
        .fetch_all(&db.pool)
        .await?;
    Ok(decode_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_substring_and_literal() {
        assert_eq!(like_pattern("air max"), "%air max%");
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn sql_uses_table_specific_name_column() {
        assert_eq!(
            search_sql(CatalogTable::Perfumes),
            "SELECT id, brand, title, images, url FROM perfumes WHERE brand ILIKE $1 OR title ILIKE $1 LIMIT $2"
        );
        assert!(search_sql(CatalogTable::Apparel).contains("OR product_name ILIKE $1"));
    }
}
