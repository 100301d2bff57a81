use crate::catalog::{CatalogTable, FacetKind};
use crate::store::CatalogStore;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// Read-only aggregate queries per table. Never fails: store errors degrade to
/// an empty list or a zero count.
#[derive(Clone)]
pub struct FacetLoader {
    store: Arc<dyn CatalogStore>,
}

impl FacetLoader {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Distinct non-null values of `kind`, in store order. Facets the table
    /// does not carry and read failures yield an empty list.
    pub async fn distinct(&self, table: CatalogTable, kind: FacetKind) -> Vec<String> {
        if !table.supports(kind) {
            return Vec::new();
        }
        match self.store.distinct_values(table, kind.column()).await {
            Ok(values) => values,
            Err(e) => {
                warn!(%table, facet = kind.column(), error = %e, "facet read failed; returning empty");
                Vec::new()
            }
        }
    }

    /// Row count; zero on any failure.
    pub async fn count(&self, table: CatalogTable) -> i64 {
        match self.store.count_rows(table).await {
            Ok(count) => count,
            Err(e) => {
                warn!(%table, error = %e, "count read failed; returning zero");
                0
            }
        }
    }

    /// One entry per table, in search order.
    pub async fn category_counts(&self) -> IndexMap<String, i64> {
        let counts = futures::future::join_all(
            CatalogTable::SEARCH_ORDER
                .into_iter()
                .map(|table| self.count(table)),
        )
        .await;
        CatalogTable::SEARCH_ORDER
            .into_iter()
            .map(|table| table.table_name().to_string())
            .zip(counts)
            .collect()
    }
}
