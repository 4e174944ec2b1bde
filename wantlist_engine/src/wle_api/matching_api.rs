use std::fmt::Debug;

use diggers_common::{dedup_preserving_order, Confidence};
use log::*;

use crate::{
    config::EngineConfig,
    db_types::{InventorySnapshot, NewWantlistReference, WantlistItem},
    inventory::{FetchPolicy, InventoryFetcher},
    matching::scorer,
    traits::{CatalogSource, SellerDirectory, WantlistManagement},
    wle_api::{
        errors::MatchingApiError,
        match_objects::{MatchReport, MatchResult},
    },
};

/// Runs the per-user match pass: every relevant seller's inventory against the user's mirrored wantlist.
pub struct MatchingApi<B, D, S> {
    db: B,
    directory: D,
    fetcher: InventoryFetcher<S>,
    config: EngineConfig,
}

impl<B, D, S> Debug for MatchingApi<B, D, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MatchingApi ({:?})", self.fetcher)
    }
}

impl<B, D, S> MatchingApi<B, D, S>
where
    B: WantlistManagement,
    D: SellerDirectory,
    S: CatalogSource,
{
    pub fn new(db: B, directory: D, fetcher: InventoryFetcher<S>, config: EngineConfig) -> Self {
        Self { db, directory, fetcher, config }
    }

    /// Match the user's wantlist against every relevant seller's inventory.
    ///
    /// Results are re-derived from the per-seller snapshots on every call; match results themselves are never
    /// cached. A result cache at this level once masked fresh per-seller data for up to an hour, so caching stays
    /// at the seller-inventory granularity only. Pass [`FetchPolicy::Bypass`] to force fresh fetches throughout;
    /// that is the debug variant of this operation.
    ///
    /// A seller that cannot be fetched is served from its stale snapshot when one is still in retention, and is
    /// skipped otherwise. Either way the pass continues; one broken seller never aborts the others.
    pub async fn find_matches(&self, user_id: i64, policy: FetchPolicy) -> Result<MatchReport, MatchingApiError> {
        let wantlist = self.db.wantlist_for_user(user_id).await?;
        let mut report = MatchReport { wantlist_count: wantlist.len(), ..MatchReport::empty(user_id) };
        if wantlist.is_empty() {
            debug!("User #{user_id} has no wantlist items. Nothing to match");
            return Ok(report);
        }
        let sellers = dedup_preserving_order(self.directory.registered_sellers_for_user(user_id).await?);
        for seller_name in &sellers {
            report.sellers_checked += 1;
            let fetched = match self.fetcher.get_inventory(seller_name, policy).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!("Inventory fetch failed for {seller_name}: {e}");
                    match self.fetcher.stale_snapshot(seller_name) {
                        Some(stale) => {
                            info!(
                                "Serving stale snapshot for {seller_name} ({} listings)",
                                stale.snapshot.item_count()
                            );
                            report.stale_sellers.push(seller_name.clone());
                            stale
                        },
                        None => {
                            report.skipped_sellers.push(seller_name.clone());
                            continue;
                        },
                    }
                },
            };
            self.match_inventory(&wantlist, &fetched.snapshot, &mut report.matches);
        }
        report
            .matches
            .sort_by(|a, b| b.confidence.cmp(&a.confidence).then(b.item.date_added.cmp(&a.item.date_added)));
        for m in &report.matches {
            self.db
                .upsert_reference(NewWantlistReference {
                    wantlist_item_id: m.item.id,
                    listing_id: m.listing.listing_id,
                    user_id,
                    confidence: m.confidence,
                })
                .await?;
        }
        info!(
            "Match pass for user #{user_id}: {} matches across {} sellers ({} skipped, {} stale)",
            report.matches.len(),
            report.sellers_checked,
            report.skipped_sellers.len(),
            report.stale_sellers.len()
        );
        Ok(report)
    }

    fn match_inventory(
        &self,
        wantlist: &[WantlistItem],
        snapshot: &InventorySnapshot,
        matches: &mut Vec<MatchResult>,
    ) {
        for listing in &snapshot.listings {
            for item in wantlist {
                // Identical catalog release ids short-circuit the heuristic.
                let confidence = if !listing.release_id.is_empty() && listing.release_id == item.release_id {
                    Confidence::MAX
                } else {
                    scorer::score(item, listing)
                };
                if confidence.exceeds(self.config.match_threshold) {
                    trace!(
                        "Match: '{}' against listing #{} '{}' at {confidence}",
                        item.title,
                        listing.listing_id,
                        listing.title
                    );
                    matches.push(MatchResult { item: item.clone(), listing: listing.clone(), confidence });
                }
            }
        }
    }
}
