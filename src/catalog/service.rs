use crate::cache::{MenuCache, SearchCache};
use crate::catalog::menu::build_menu;
use crate::catalog::{FacetLoader, SearchAggregator};
use crate::store::CatalogStore;
use bytes::Bytes;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Owns the read caches and the loaders behind `/api/menu` and `/api/search`.
///
/// Cache misses rebuild outside any lock; concurrent misses may rebuild twice.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    facets: FacetLoader,
    search: SearchAggregator,
    menu_cache: MenuCache,
    search_cache: SearchCache,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self::with_caches(store, MenuCache::default(), SearchCache::default())
    }

    pub fn with_caches(
        store: Arc<dyn CatalogStore>,
        menu_cache: MenuCache,
        search_cache: SearchCache,
    ) -> Self {
        Self {
            facets: FacetLoader::new(store.clone()),
            search: SearchAggregator::new(store.clone()),
            store,
            menu_cache,
            search_cache,
        }
    }

    /// Serialized menu, from cache while fresh.
    pub async fn menu_json(&self, now: Instant) -> serde_json::Result<Bytes> {
        if let Some(cached) = self.menu_cache.get(now) {
            debug!("menu cache hit");
            return Ok(cached);
        }
        debug!("menu cache miss; rebuilding");

        let menu = build_menu(self.store.as_ref(), &self.facets).await;
        let body = Bytes::from(serde_json::to_vec(&menu)?);
        self.menu_cache.put(body.clone(), now);
        Ok(body)
    }

    /// Serialized search response. The default view (no query, no category)
    /// bypasses the cache.
    pub async fn search_json(
        &self,
        query: &str,
        category: &str,
        now: Instant,
    ) -> serde_json::Result<Bytes> {
        if query.is_empty() && category.is_empty() {
            let view = self.search.default_view().await;
            return serde_json::to_vec(&view).map(Bytes::from);
        }

        let key = SearchCache::key(query, category);
        if let Some(cached) = self.search_cache.get(&key, now) {
            debug!(key = %key, "search cache hit");
            return Ok(cached);
        }

        let response = self.search.search(query, category).await;
        let body = Bytes::from(serde_json::to_vec(&response)?);
        self.search_cache.put(key, body.clone(), now);
        Ok(body)
    }

    /// Flat table -> row count map, uncached.
    pub async fn category_counts(&self) -> IndexMap<String, i64> {
        self.facets.category_counts().await
    }

    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MENU_TTL, SEARCH_TTL};
    use crate::catalog::{CatalogTable, RawValue};
    use crate::database_ops::memory::MemoryStore;
    use std::time::Duration;

    fn store() -> Arc<MemoryStore> {
        let store = MemoryStore::default();
        store.push_row(
            CatalogTable::Sneakers,
            vec![
                ("id".into(), RawValue::Int(1)),
                ("brand".into(), RawValue::Text("Nike".into())),
                ("product_name".into(), RawValue::Text("Air Max".into())),
            ],
        );
        Arc::new(store)
    }

    #[tokio::test]
    async fn menu_is_served_from_cache_within_ttl() {
        let store = store();
        let service = CatalogService::new(store.clone());
        let t0 = Instant::now();

        let first = service.menu_json(t0).await.unwrap();
        let reads = store.read_count();
        assert!(reads > 0);

        let second = service.menu_json(t0 + MENU_TTL - Duration::from_secs(1)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.read_count(), reads);

        service.menu_json(t0 + MENU_TTL).await.unwrap();
        assert_eq!(store.read_count(), 2 * reads);
    }

    #[tokio::test]
    async fn menu_cache_holds_payload_built_during_outage() {
        let store = store();
        store.set_failing(true);
        let service = CatalogService::new(store.clone());
        let t0 = Instant::now();

        let degraded = service.menu_json(t0).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&degraded).unwrap();
        assert_eq!(json["sneaker"]["brands"], serde_json::json!([]));

        // recovery is only visible once the degraded payload expires
        store.set_failing(false);
        assert_eq!(service.menu_json(t0 + Duration::from_secs(1)).await.unwrap(), degraded);
        let fresh = service.menu_json(t0 + MENU_TTL).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&fresh).unwrap();
        assert_eq!(json["sneaker"]["brands"], serde_json::json!(["Nike"]));
    }

    #[tokio::test]
    async fn search_is_cached_per_query_and_category() {
        let store = store();
        let service = CatalogService::new(store.clone());
        let t0 = Instant::now();

        let body = service.search_json("nike", "", t0).await.unwrap();
        let reads = store.read_count();
        assert_eq!(service.search_json("nike", "", t0).await.unwrap(), body);
        assert_eq!(store.read_count(), reads);

        // different category is a different key
        service.search_json("nike", "sneakers", t0).await.unwrap();
        assert_eq!(store.read_count(), reads + 1);

        service.search_json("nike", "", t0 + SEARCH_TTL + SEARCH_TTL).await.unwrap();
        assert!(store.read_count() > reads + 1);
    }

    #[tokio::test]
    async fn default_view_is_never_cached() {
        let store = store();
        let service = CatalogService::new(store.clone());
        let t0 = Instant::now();

        let body = service.search_json("", "", t0).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["categoryCounts"]["sneakers"], 1);

        store.push_row(CatalogTable::Sneakers, vec![("id".into(), RawValue::Int(2))]);
        let body = service.search_json("", "", t0).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["categoryCounts"]["sneakers"], 2);
    }
}
