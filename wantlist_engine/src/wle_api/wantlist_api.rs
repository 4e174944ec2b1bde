use std::{collections::HashSet, fmt::Debug, sync::Arc};

use chrono::{Duration, Utc};
use discogs_tools::Want;
use log::*;

use crate::{
    cache::{keys, TtlCache},
    config::EngineConfig,
    db_types::{NewWantlistItem, UserHandle, WantlistItem, WantlistReference},
    traits::{CatalogSource, WantlistManagement},
    wle_api::{errors::WantlistApiError, match_objects::WantlistStats},
};

/// Request/response operations over wantlist entities: sync, list, stats, cleanup and deletes.
pub struct WantlistApi<B, S> {
    db: B,
    source: S,
    cache: Arc<TtlCache>,
    config: EngineConfig,
}

impl<B, S> Debug for WantlistApi<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WantlistApi ({:?})", self.cache)
    }
}

impl<B, S> WantlistApi<B, S>
where
    B: WantlistManagement,
    S: CatalogSource,
{
    pub fn new(db: B, source: S, cache: Arc<TtlCache>, config: EngineConfig) -> Self {
        Self { db, source, cache, config }
    }

    /// Mirror the user's external wantlist into the local store.
    ///
    /// Unless `force_refresh` is set, a wantlist checked within the sync freshness window is returned as-is without
    /// touching the catalog. A refresh upserts per (user, want id): existing items are updated in place, so local
    /// item ids and references survive a sync.
    pub async fn sync_wantlist(
        &self,
        user: &UserHandle,
        force_refresh: bool,
    ) -> Result<Vec<WantlistItem>, WantlistApiError> {
        if !force_refresh {
            if let Some(last_checked) = self.db.latest_check_for_user(user.user_id).await? {
                let age = Utc::now().signed_duration_since(last_checked).num_seconds();
                if age < self.config.sync_freshness_secs {
                    debug!("Wantlist for {user} is up to date ({age}s old)");
                    return self.db.wantlist_for_user(user.user_id).await.map_err(Into::into);
                }
            }
        }
        let wants = self.fetch_remote_wantlist(user, force_refresh).await?;
        if wants.is_empty() {
            warn!("No wantlist data found for {user}");
            return Ok(Vec::new());
        }
        let mut synced = Vec::with_capacity(wants.len());
        for want in &wants {
            let item = self.db.upsert_wantlist_item(NewWantlistItem::from_want(user.user_id, want)).await?;
            synced.push(item);
        }
        info!("Synced {} wantlist items for {user}", synced.len());
        Ok(synced)
    }

    async fn fetch_remote_wantlist(
        &self,
        user: &UserHandle,
        force_refresh: bool,
    ) -> Result<Vec<Want>, WantlistApiError> {
        let key = keys::wantlist(user.user_id);
        let ttl = self.config.wantlist_ttl_secs;
        let compute = || self.fetch_all_wantlist_pages(&user.username);
        if force_refresh {
            self.cache.refresh(&key, ttl, compute).await
        } else {
            self.cache.get_or_compute(&key, ttl, compute).await
        }
    }

    async fn fetch_all_wantlist_pages(&self, username: &str) -> Result<Vec<Want>, WantlistApiError> {
        let per_page = self.config.catalog_page_size;
        let mut wants = Vec::new();
        let mut page = 1;
        loop {
            let result = self.source.wantlist_page(username, page, per_page).await?;
            let empty_page = result.wants.is_empty();
            wants.extend(result.wants);
            if page >= result.pagination.pages || empty_page {
                break;
            }
            if page >= self.config.max_wantlist_pages {
                warn!("Stopping wantlist pagination for {username} at the {page}-page safety cap");
                break;
            }
            page += 1;
        }
        debug!("Fetched {} wantlist entries for {username}", wants.len());
        Ok(wants)
    }

    /// The user's locally mirrored wantlist, most recently added first.
    pub async fn wantlist_for_user(&self, user_id: i64) -> Result<Vec<WantlistItem>, WantlistApiError> {
        self.db.wantlist_for_user(user_id).await.map_err(Into::into)
    }

    /// The user's current references, newest first.
    pub async fn references_for_user(&self, user_id: i64) -> Result<Vec<WantlistReference>, WantlistApiError> {
        self.db.references_for_user(user_id).await.map_err(Into::into)
    }

    pub async fn stats_for_user(&self, user_id: i64) -> Result<WantlistStats, WantlistApiError> {
        let items = self.db.wantlist_for_user(user_id).await?;
        let references = self.db.references_for_user(user_id).await?;
        let unique_listings = references.iter().map(|r| r.listing_id).collect::<HashSet<i64>>().len();
        let week_ago = Utc::now() - Duration::days(7);
        let recent_references = references.iter().filter(|r| r.created_at >= week_ago).count();
        Ok(WantlistStats {
            wantlist_items: items.len(),
            total_references: references.len(),
            unique_listings,
            recent_references,
        })
    }

    /// Delete references older than the retention window (the configured default when `days` is `None`). Returns
    /// the number deleted. Scheduling this periodically is the host application's job.
    pub async fn cleanup_old_references(&self, days: Option<i64>) -> Result<usize, WantlistApiError> {
        let days = days.unwrap_or(self.config.reference_retention_days);
        let cutoff = Utc::now() - Duration::days(days);
        self.db.delete_references_older_than(cutoff).await.map_err(Into::into)
    }

    /// Owner-checked delete of one wantlist item and its references.
    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<(), WantlistApiError> {
        self.db.delete_wantlist_item(user_id, item_id).await.map_err(Into::into)
    }

    /// Owner-checked delete of one reference.
    pub async fn delete_reference(&self, user_id: i64, reference_id: i64) -> Result<(), WantlistApiError> {
        self.db.delete_reference(user_id, reference_id).await.map_err(Into::into)
    }
}
