use crate::catalog::projector::{project_rows, ProductRecord};
use crate::catalog::{CatalogTable, FacetKind, FacetLoader};
use crate::store::CatalogStore;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// One table's menu section. Facets a table does not carry are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub brands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragrance_families: Option<Vec<String>>,
    pub products: Vec<ProductRecord>,
}

/// Full cross-category menu, keyed by `CatalogTable::menu_key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MenuPayload {
    sections: IndexMap<&'static str, MenuSection>,
}

impl MenuPayload {
    pub fn section(&self, table: CatalogTable) -> Option<&MenuSection> {
        self.sections.get(table.menu_key())
    }
}

/// Pick `positions` out of `rows`; positions past the end are skipped.
pub fn pick_positions(rows: &[ProductRecord], positions: &[usize]) -> Vec<ProductRecord> {
    positions
        .iter()
        .filter_map(|&idx| rows.get(idx).cloned())
        .collect()
}

async fn sample_products(store: &dyn CatalogStore, table: CatalogTable) -> Vec<ProductRecord> {
    match store.fetch_rows(table, &table.menu_columns()).await {
        Ok(rows) => pick_positions(&project_rows(rows), table.sample_positions()),
        Err(e) => {
            warn!(%table, error = %e, "menu product read failed; returning empty");
            Vec::new()
        }
    }
}

async fn build_section(
    store: &dyn CatalogStore,
    facets: &FacetLoader,
    table: CatalogTable,
) -> MenuSection {
    let optional = move |kind: FacetKind| async move {
        if table.supports(kind) {
            Some(facets.distinct(table, kind).await)
        } else {
            None
        }
    };

    let (brands, subcategories, genders, fragrance_families, products) = futures::join!(
        facets.distinct(table, FacetKind::Brand),
        optional(FacetKind::Subcategory),
        optional(FacetKind::Gender),
        optional(FacetKind::FragranceFamily),
        sample_products(store, table),
    );

    MenuSection {
        brands,
        subcategories,
        genders,
        fragrance_families,
        products,
    }
}

/// Assemble the menu from the store. Read failures leave empty lists.
pub async fn build_menu(store: &dyn CatalogStore, facets: &FacetLoader) -> MenuPayload {
    let sections = futures::future::join_all(
        CatalogTable::ALL
            .into_iter()
            .map(|table| build_section(store, facets, table)),
    )
    .await;

    MenuPayload {
        sections: CatalogTable::ALL
            .into_iter()
            .map(CatalogTable::menu_key)
            .zip(sections)
            .collect(),
    }
}
