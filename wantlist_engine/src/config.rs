use diggers_common::parse_boolean_flag;
use log::*;

use crate::cache::TtlCache;

/// Tunables for the inventory fetcher and the matching engine.
///
/// Every value has a sensible default; `new_from_env_or_default` overrides from `DGG_MATCH_*` variables and warns on
/// unparseable input instead of failing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Freshness window for a regular seller's inventory snapshot.
    pub inventory_ttl_secs: i64,
    /// Freshness window for a large seller's snapshot. Refetching a huge inventory is expensive, so it is cached
    /// longer even though staleness grows.
    pub large_seller_ttl_secs: i64,
    /// Inventory size at which a seller counts as large.
    pub large_seller_threshold: usize,
    /// How long a snapshot stays in the cache at all. Past its freshness window but within retention, it is only
    /// served as an explicit stale fallback.
    pub snapshot_retention_secs: i64,
    /// TTL for the memoized remote wantlist during sync.
    pub wantlist_ttl_secs: i64,
    /// A wantlist checked within this window is not re-fetched by a non-forced sync.
    pub sync_freshness_secs: i64,
    /// Page size used against the catalog's paginated endpoints.
    pub catalog_page_size: u32,
    /// Sellers reporting more than this many inventory pages are refused outright.
    pub max_inventory_pages: u32,
    /// Safety cap on wantlist pagination.
    pub max_wantlist_pages: u32,
    /// A pair is accepted iff its score strictly exceeds this.
    pub match_threshold: f64,
    /// Default age in days beyond which references are cleaned up.
    pub reference_retention_days: i64,
    /// Disables the cache entirely; every call behaves as a cold start.
    pub cache_disabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inventory_ttl_secs: 3_600,
            large_seller_ttl_secs: 7_200,
            large_seller_threshold: 10_000,
            snapshot_retention_secs: 86_400,
            wantlist_ttl_secs: 1_800,
            sync_freshness_secs: 1_800,
            catalog_page_size: 100,
            max_inventory_pages: 100,
            max_wantlist_pages: 10,
            match_threshold: 0.70,
            reference_retention_days: 30,
            cache_disabled: false,
        }
    }
}

impl EngineConfig {
    pub fn new_from_env_or_default() -> Self {
        let mut config = Self::default();
        override_i64("DGG_MATCH_INVENTORY_TTL_SECS", &mut config.inventory_ttl_secs);
        override_i64("DGG_MATCH_LARGE_SELLER_TTL_SECS", &mut config.large_seller_ttl_secs);
        override_usize("DGG_MATCH_LARGE_SELLER_THRESHOLD", &mut config.large_seller_threshold);
        override_i64("DGG_MATCH_SNAPSHOT_RETENTION_SECS", &mut config.snapshot_retention_secs);
        override_i64("DGG_MATCH_WANTLIST_TTL_SECS", &mut config.wantlist_ttl_secs);
        override_i64("DGG_MATCH_SYNC_FRESHNESS_SECS", &mut config.sync_freshness_secs);
        override_i64("DGG_MATCH_REFERENCE_RETENTION_DAYS", &mut config.reference_retention_days);
        config.cache_disabled = parse_boolean_flag(std::env::var("DGG_CACHE_DISABLED").ok(), config.cache_disabled);
        if let Ok(threshold) = std::env::var("DGG_MATCH_THRESHOLD") {
            match threshold.parse::<f64>() {
                Ok(t) if (0.0..1.0).contains(&t) => config.match_threshold = t,
                _ => warn!("DGG_MATCH_THRESHOLD must be a float in [0, 1), using {}", config.match_threshold),
            }
        }
        config
    }

    /// The cache this configuration calls for: a live TTL cache, or a no-op one when `cache_disabled` is set.
    pub fn build_cache(&self) -> TtlCache {
        if self.cache_disabled {
            warn!("Caching is disabled. Every catalog call will go to the source");
            TtlCache::disabled()
        } else {
            TtlCache::new()
        }
    }
}

fn override_i64(var: &str, target: &mut i64) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<i64>() {
            Ok(v) if v > 0 => *target = v,
            _ => warn!("{var} is not a positive integer, using {target}"),
        }
    }
}

fn override_usize(var: &str, target: &mut usize) {
    if let Ok(value) = std::env::var(var) {
        match value.parse::<usize>() {
            Ok(v) => *target = v,
            Err(_) => warn!("{var} is not an integer, using {target}"),
        }
    }
}
