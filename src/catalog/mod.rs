// Catalog domain: the five product tables and the read paths built on them.

pub mod facets;
pub mod menu;
pub mod projector;
pub mod search;
pub mod service;

pub use facets::FacetLoader;
pub use menu::{MenuPayload, MenuSection};
pub use projector::{FieldValue, ProductRecord, RawRow, RawValue};
pub use search::{SearchAggregator, SearchResponse};
pub use service::CatalogService;

/// One of the fixed product tables backing the storefront.
///
/// Each table has its own column naming for the display name and the link, so
/// every per-table SQL fragment is derived from here and never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    Sneakers,
    Apparel,
    Watches,
    Perfumes,
    Accessories,
}

/// Distinct-value dimensions loaded for the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Brand,
    Subcategory,
    Gender,
    FragranceFamily,
}

impl FacetKind {
    pub fn column(self) -> &'static str {
        match self {
            FacetKind::Brand => "brand",
            FacetKind::Subcategory => "subcategory",
            FacetKind::Gender => "gender",
            FacetKind::FragranceFamily => "fragrance_family",
        }
    }
}

impl CatalogTable {
    /// Menu order.
    pub const ALL: [CatalogTable; 5] = [
        CatalogTable::Sneakers,
        CatalogTable::Apparel,
        CatalogTable::Watches,
        CatalogTable::Perfumes,
        CatalogTable::Accessories,
    ];

    /// Order used by cross-category search and the category counts. Earlier
    /// tables win when the combined result is truncated.
    pub const SEARCH_ORDER: [CatalogTable; 5] = [
        CatalogTable::Sneakers,
        CatalogTable::Apparel,
        CatalogTable::Accessories,
        CatalogTable::Perfumes,
        CatalogTable::Watches,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            CatalogTable::Sneakers => "sneakers",
            CatalogTable::Apparel => "apparel",
            CatalogTable::Watches => "watches",
            CatalogTable::Perfumes => "perfumes",
            CatalogTable::Accessories => "accessories",
        }
    }

    /// Key of this table's section in the menu payload.
    pub fn menu_key(self) -> &'static str {
        match self {
            CatalogTable::Sneakers => "sneaker",
            CatalogTable::Apparel => "apparel",
            CatalogTable::Watches => "watch",
            CatalogTable::Perfumes => "perfume",
            CatalogTable::Accessories => "accessories",
        }
    }

    /// Resolve a table name as sent by clients (`?category=watches`).
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|table| table.table_name() == name.trim())
    }

    pub fn name_column(self) -> &'static str {
        match self {
            CatalogTable::Watches => "name",
            CatalogTable::Perfumes => "title",
            _ => "product_name",
        }
    }

    pub fn link_column(self) -> &'static str {
        match self {
            CatalogTable::Watches => "link",
            CatalogTable::Perfumes => "url",
            _ => "product_link",
        }
    }

    /// Columns returned by search: id, brand, display name, images, link.
    pub fn search_columns(self) -> [&'static str; 5] {
        ["id", "brand", self.name_column(), "images", self.link_column()]
    }

    /// Columns returned for the menu's sample products.
    pub fn menu_columns(self) -> Vec<&'static str> {
        let mut cols = self.search_columns().to_vec();
        match self {
            CatalogTable::Sneakers => {}
            CatalogTable::Apparel | CatalogTable::Accessories => {
                cols.extend(["gender", "subcategory"]);
            }
            CatalogTable::Watches => cols.push("gender"),
            CatalogTable::Perfumes => cols.extend(["fragrance_family", "subcategory"]),
        }
        cols
    }

    /// Facets published in this table's menu section.
    pub fn facets(self) -> &'static [FacetKind] {
        match self {
            CatalogTable::Sneakers => &[FacetKind::Brand],
            CatalogTable::Apparel | CatalogTable::Accessories => {
                &[FacetKind::Brand, FacetKind::Subcategory, FacetKind::Gender]
            }
            CatalogTable::Watches => &[FacetKind::Brand, FacetKind::Gender],
            CatalogTable::Perfumes => &[
                FacetKind::Brand,
                FacetKind::Subcategory,
                FacetKind::FragranceFamily,
            ],
        }
    }

    pub fn supports(self, kind: FacetKind) -> bool {
        self.facets().contains(&kind)
    }

    /// Curated positions (into the unordered full-table result) shown in the menu.
    pub fn sample_positions(self) -> &'static [usize] {
        match self {
            CatalogTable::Sneakers => &[2, 4, 6, 8, 10, 13, 15, 16, 20],
            _ => &[1, 2, 3, 4, 5, 6],
        }
    }
}

impl std::fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}
