use crate::catalog::projector::{project_rows, ProductRecord};
use crate::catalog::{CatalogTable, FacetLoader};
use crate::store::CatalogStore;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cap per table and for the merged cross-category result.
pub const SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub products: Vec<ProductRecord>,
    #[serde(rename = "categoryCounts", skip_serializing_if = "Option::is_none")]
    pub category_counts: Option<IndexMap<String, i64>>,
}

/// Fans a free-text query out over one or all catalog tables.
#[derive(Clone)]
pub struct SearchAggregator {
    store: Arc<dyn CatalogStore>,
    facets: FacetLoader,
}

impl SearchAggregator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        let facets = FacetLoader::new(store.clone());
        Self { store, facets }
    }

    /// Empty query and category yields the default view (counts, no products).
    /// An unknown category yields no products.
    pub async fn search(&self, query: &str, category: &str) -> SearchResponse {
        if query.is_empty() && category.is_empty() {
            return self.default_view().await;
        }

        let products = if category.is_empty() {
            self.search_all(query).await
        } else {
            match CatalogTable::from_table_name(category) {
                Some(table) => self.search_table(table, query).await,
                None => {
                    debug!(category, "search in unknown category");
                    Vec::new()
                }
            }
        };

        SearchResponse {
            products,
            category_counts: None,
        }
    }

    pub async fn default_view(&self) -> SearchResponse {
        SearchResponse {
            products: Vec::new(),
            category_counts: Some(self.facets.category_counts().await),
        }
    }

    pub async fn search_table(&self, table: CatalogTable, query: &str) -> Vec<ProductRecord> {
        match self
            .store
            .search_rows(table, query, SEARCH_LIMIT as i64)
            .await
        {
            Ok(rows) => {
                let mut products = project_rows(rows);
                products.truncate(SEARCH_LIMIT);
                products
            }
            Err(e) => {
                warn!(%table, error = %e, "search read failed; returning empty");
                Vec::new()
            }
        }
    }

    /// Concatenate per-table results in `SEARCH_ORDER`, then keep the first
    /// `SEARCH_LIMIT`.
    pub async fn search_all(&self, query: &str) -> Vec<ProductRecord> {
        let per_table = futures::future::join_all(
            CatalogTable::SEARCH_ORDER
                .into_iter()
                .map(|table| self.search_table(table, query)),
        )
        .await;

        let mut merged: Vec<ProductRecord> = per_table.into_iter().flatten().collect();
        merged.truncate(SEARCH_LIMIT);
        merged
    }
}
