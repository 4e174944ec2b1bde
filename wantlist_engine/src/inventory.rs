use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;
use thiserror::Error;

use crate::{
    cache::{keys, TtlCache},
    config::EngineConfig,
    db_types::{InventorySnapshot, Listing},
    traits::{CatalogSource, CatalogSourceError},
};

/// How a fetch treats the per-seller snapshot cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Serve a snapshot that is within its freshness window without revalidation; refetch otherwise. This is the
    /// honest name for what used to be called "incremental": there is no delta sync against the catalog, only a
    /// cache-first preference.
    #[default]
    CachePreferred,
    /// Always refetch and overwrite the cached snapshot, even if a fresh one exists.
    Bypass,
}

#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    #[error("Catalog fetch failed for {seller_name}: {source}")]
    Source {
        seller_name: String,
        #[source]
        source: CatalogSourceError,
    },
    #[error("Seller {seller_name} is too large for the catalog API ({pages} pages, {items} items)")]
    TooLarge { seller_name: String, pages: u32, items: u64 },
}

/// A seller's inventory as returned by the fetcher, with provenance flags.
#[derive(Debug, Clone)]
pub struct FetchedInventory {
    pub snapshot: InventorySnapshot,
    /// True when the snapshot came out of the cache rather than a live fetch.
    pub from_cache: bool,
    /// True when the snapshot is past its freshness window and was served as an explicit stale fallback.
    pub is_stale: bool,
}

/// Cache-preferring fetcher for full seller inventories.
///
/// The cache key is derived from the seller name alone: one snapshot per seller, shared by every user interested in
/// that seller. Snapshots stay in the cache for the retention period; whether one counts as fresh is judged
/// separately, against a TTL class picked by inventory size.
pub struct InventoryFetcher<S> {
    source: S,
    cache: Arc<TtlCache>,
    config: EngineConfig,
}

impl<S> std::fmt::Debug for InventoryFetcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InventoryFetcher ({:?})", self.cache)
    }
}

impl<S> InventoryFetcher<S>
where S: CatalogSource
{
    pub fn new(source: S, cache: Arc<TtlCache>, config: EngineConfig) -> Self {
        Self { source, cache, config }
    }

    /// Fetch one seller's full inventory, honoring the given cache policy.
    ///
    /// Failures are typed and scoped to this seller; the fetcher never fabricates an empty inventory. Callers that
    /// want to fall back to stale data after a failure should ask [`Self::stale_snapshot`] explicitly.
    pub async fn get_inventory(
        &self,
        seller_name: &str,
        policy: FetchPolicy,
    ) -> Result<FetchedInventory, InventoryError> {
        let key = keys::seller_inventory(seller_name);
        match policy {
            FetchPolicy::CachePreferred => {
                if let Some(snapshot) = self.cache.get::<InventorySnapshot>(&key) {
                    if self.is_fresh(&snapshot) {
                        debug!("Cache hit for {seller_name} ({} listings)", snapshot.item_count());
                        return Ok(FetchedInventory { snapshot, from_cache: true, is_stale: false });
                    }
                    debug!("Snapshot for {seller_name} is past its freshness window. Refetching");
                }
            },
            FetchPolicy::Bypass => debug!("Bypassing inventory cache for {seller_name}"),
        }
        let snapshot = self.fetch_full(seller_name).await?;
        self.cache.put(&key, &snapshot, self.config.snapshot_retention_secs);
        Ok(FetchedInventory { snapshot, from_cache: false, is_stale: false })
    }

    /// The cached snapshot for the seller, if any is still within retention, with its staleness marked. Used by
    /// callers that prefer stale data over no data after a failed fetch.
    pub fn stale_snapshot(&self, seller_name: &str) -> Option<FetchedInventory> {
        let snapshot = self.cache.get::<InventorySnapshot>(&keys::seller_inventory(seller_name))?;
        let is_stale = !self.is_fresh(&snapshot);
        Some(FetchedInventory { snapshot, from_cache: true, is_stale })
    }

    fn ttl_class_secs(&self, item_count: usize) -> i64 {
        if item_count >= self.config.large_seller_threshold {
            self.config.large_seller_ttl_secs
        } else {
            self.config.inventory_ttl_secs
        }
    }

    fn is_fresh(&self, snapshot: &InventorySnapshot) -> bool {
        let age = self.cache.now_epoch() - snapshot.fetched_at.timestamp();
        age <= self.ttl_class_secs(snapshot.item_count())
    }

    async fn fetch_full(&self, seller_name: &str) -> Result<InventorySnapshot, InventoryError> {
        let per_page = self.config.catalog_page_size;
        let mut page = 1;
        let mut listings = Vec::new();
        loop {
            let result = self
                .source
                .inventory_page(seller_name, page, per_page)
                .await
                .map_err(|e| InventoryError::Source { seller_name: seller_name.to_string(), source: e })?;
            if page == 1 && result.pagination.pages > self.config.max_inventory_pages {
                info!(
                    "Refusing inventory fetch for {seller_name}: {} pages, {} items",
                    result.pagination.pages, result.pagination.items
                );
                return Err(InventoryError::TooLarge {
                    seller_name: seller_name.to_string(),
                    pages: result.pagination.pages,
                    items: result.pagination.items,
                });
            }
            let empty_page = result.listings.is_empty();
            listings.extend(result.listings.iter().map(|l| Listing::from_inventory_listing(seller_name, l)));
            if page >= result.pagination.pages || empty_page {
                break;
            }
            page += 1;
        }
        let fetched_at =
            DateTime::<Utc>::from_timestamp(self.cache.now_epoch(), 0).unwrap_or_else(Utc::now);
        info!("Fetched {} listings for {seller_name}", listings.len());
        Ok(InventorySnapshot { seller_name: seller_name.to_string(), listings, fetched_at })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{listing_fixture, ManualClock, MockCatalogSource};

    fn fetcher_with(
        source: MockCatalogSource,
        clock: Arc<ManualClock>,
        config: EngineConfig,
    ) -> InventoryFetcher<MockCatalogSource> {
        let cache = Arc::new(TtlCache::with_clock(clock));
        InventoryFetcher::new(source, cache, config)
    }

    #[tokio::test]
    async fn concatenates_pages_in_source_order() {
        let clock = Arc::new(ManualClock::new(1_000));
        let source = MockCatalogSource::new();
        let listings: Vec<_> = (0..5).map(|i| listing_fixture(i, &format!("Record {i}"), None)).collect();
        source.set_inventory("vinyl_vault", listings);
        let config = EngineConfig { catalog_page_size: 2, ..EngineConfig::default() };
        let fetcher = fetcher_with(source, clock, config);

        let fetched = fetcher.get_inventory("vinyl_vault", FetchPolicy::CachePreferred).await.unwrap();
        let ids: Vec<i64> = fetched.snapshot.listings.iter().map(|l| l.listing_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(!fetched.from_cache);
    }

    #[tokio::test]
    async fn refuses_sellers_beyond_the_page_limit() {
        let clock = Arc::new(ManualClock::new(1_000));
        let source = MockCatalogSource::new();
        let listings: Vec<_> = (0..12).map(|i| listing_fixture(i, "Record", None)).collect();
        source.set_inventory("megastore", listings);
        let config =
            EngineConfig { catalog_page_size: 2, max_inventory_pages: 5, ..EngineConfig::default() };
        let fetcher = fetcher_with(source, clock, config);

        match fetcher.get_inventory("megastore", FetchPolicy::CachePreferred).await {
            Err(InventoryError::TooLarge { pages, items, .. }) => {
                assert_eq!(pages, 6);
                assert_eq!(items, 12);
            },
            other => panic!("expected TooLarge, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn large_sellers_stay_fresh_longer() {
        let clock = Arc::new(ManualClock::new(1_000));
        let source = MockCatalogSource::new();
        let listings: Vec<_> = (0..10).map(|i| listing_fixture(i, "Record", None)).collect();
        source.set_inventory("big_seller", listings);
        let config = EngineConfig {
            large_seller_threshold: 10,
            inventory_ttl_secs: 100,
            large_seller_ttl_secs: 500,
            ..EngineConfig::default()
        };
        let fetcher = fetcher_with(source.clone(), clock.clone(), config);

        fetcher.get_inventory("big_seller", FetchPolicy::CachePreferred).await.unwrap();
        clock.advance(300); // past the regular ttl, within the large-seller ttl
        let fetched = fetcher.get_inventory("big_seller", FetchPolicy::CachePreferred).await.unwrap();
        assert!(fetched.from_cache);
        assert_eq!(source.inventory_fetches("big_seller"), 1);
    }

    #[tokio::test]
    async fn stale_snapshot_is_marked_stale_after_its_window() {
        let clock = Arc::new(ManualClock::new(1_000));
        let source = MockCatalogSource::new();
        source.set_inventory("vinyl_vault", vec![listing_fixture(1, "Record", None)]);
        let config = EngineConfig { inventory_ttl_secs: 100, ..EngineConfig::default() };
        let fetcher = fetcher_with(source, clock.clone(), config);

        fetcher.get_inventory("vinyl_vault", FetchPolicy::CachePreferred).await.unwrap();
        assert!(!fetcher.stale_snapshot("vinyl_vault").unwrap().is_stale);
        clock.advance(101);
        assert!(fetcher.stale_snapshot("vinyl_vault").unwrap().is_stale);
    }
}
