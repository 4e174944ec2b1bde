use diggers_common::Confidence;
use serde::{Deserialize, Serialize};

use crate::db_types::{Listing, WantlistItem};

/// One accepted (wantlist item, listing) pairing with its confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub item: WantlistItem,
    pub listing: Listing,
    pub confidence: Confidence,
}

/// The outcome of a full match pass for one user.
///
/// `matches` is ordered by descending confidence, ties broken by the most recently added wantlist item. Sellers that
/// could not be fetched at all land in `skipped_sellers`; sellers served from a snapshot past its freshness window
/// land in `stale_sellers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub user_id: i64,
    pub wantlist_count: usize,
    pub sellers_checked: usize,
    pub skipped_sellers: Vec<String>,
    pub stale_sellers: Vec<String>,
    pub matches: Vec<MatchResult>,
}

impl MatchReport {
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            wantlist_count: 0,
            sellers_checked: 0,
            skipped_sellers: Vec::new(),
            stale_sellers: Vec::new(),
            matches: Vec::new(),
        }
    }
}

/// Summary numbers for a user's wantlist screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WantlistStats {
    pub wantlist_items: usize,
    pub total_references: usize,
    /// Distinct listings referenced at least once.
    pub unique_listings: usize,
    /// References created within the last seven days.
    pub recent_references: usize,
}
