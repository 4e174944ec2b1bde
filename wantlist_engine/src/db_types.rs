use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use diggers_common::Confidence;
use discogs_tools::{InventoryListing, Want};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------    WantlistItem   ------------------------------------------------------------

/// A user's desired catalog item, mirrored locally from the external wantlist.
///
/// Rows are created and refreshed exclusively by the sync operation and deleted explicitly by the owning user.
/// Uniqueness is per (user_id, want_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WantlistItem {
    pub id: i64,
    pub user_id: i64,
    /// The external wantlist entry id.
    pub want_id: String,
    /// The external release id this want points at.
    pub release_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub thumb_url: Option<String>,
    /// When the item was added to the wantlist on the external catalog.
    pub date_added: Option<DateTime<Utc>>,
    /// When the local mirror last saw this entry during a sync.
    pub last_checked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert/refresh form of [`WantlistItem`], as produced from the external source's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWantlistItem {
    pub user_id: i64,
    pub want_id: String,
    pub release_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub year: Option<i32>,
    pub format: Option<String>,
    pub thumb_url: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
}

impl NewWantlistItem {
    pub fn from_want(user_id: i64, want: &Want) -> Self {
        let info = &want.basic_information;
        Self {
            user_id,
            want_id: want.id.to_string(),
            release_id: info.id.to_string(),
            title: info.title.clone(),
            artists: info.artist_names(),
            year: info.year,
            format: info.format_summary(),
            thumb_url: info.thumb.clone(),
            date_added: want.date_added,
        }
    }
}

//--------------------------------------   ListingStatus   ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    /// The listing is live and purchasable.
    ForSale,
    /// The listing has been sold.
    Sold,
    /// The seller has not published the listing yet.
    Draft,
    /// The listing has lapsed on the marketplace.
    Expired,
}

impl Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingStatus::ForSale => write!(f, "For Sale"),
            ListingStatus::Sold => write!(f, "Sold"),
            ListingStatus::Draft => write!(f, "Draft"),
            ListingStatus::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid listing status: {0}")]
pub struct ConversionError(String);

impl FromStr for ListingStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "For Sale" => Ok(Self::ForSale),
            "Sold" => Ok(Self::Sold),
            "Draft" => Ok(Self::Draft),
            "Expired" => Ok(Self::Expired),
            s => Err(ConversionError(format!("Invalid listing status: {s}"))),
        }
    }
}

impl From<String> for ListingStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Unknown listing status '{value}' from the catalog. Treating it as Expired");
            ListingStatus::Expired
        })
    }
}

//--------------------------------------      Listing      ------------------------------------------------------------

/// One seller's for-sale item, in the shape the matching engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub listing_id: i64,
    pub seller_name: String,
    pub release_id: String,
    /// The marketplace display title, "Artist - Title (Format)".
    pub title: String,
    pub price_value: f64,
    pub currency: String,
    pub media_condition: Option<String>,
    pub sleeve_condition: Option<String>,
    pub year: Option<i32>,
    pub status: ListingStatus,
    pub listing_url: Option<String>,
    pub listed_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Converts a raw inventory entry into a domain listing. The inventory endpoint implies the seller, so the
    /// seller name is supplied by the caller.
    pub fn from_inventory_listing(seller_name: &str, source: &InventoryListing) -> Self {
        Self {
            listing_id: source.id,
            seller_name: seller_name.to_string(),
            release_id: source.release.id.to_string(),
            title: source.release.display_title(),
            price_value: source.price.value,
            currency: source.price.currency.clone(),
            media_condition: source.condition.clone(),
            sleeve_condition: source.sleeve_condition.clone(),
            year: source.release.year,
            status: ListingStatus::from(source.status.clone()),
            listing_url: source.uri.clone(),
            listed_at: source.posted,
        }
    }
}

//-------------------------------------- WantlistReference ------------------------------------------------------------

/// A derived link between a wantlist item and a seller listing, carrying the match confidence.
///
/// Unique per (wantlist_item_id, listing_id). References are regenerated wholesale on re-match: an upsert refreshes
/// the confidence of an existing link rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WantlistReference {
    pub id: i64,
    pub wantlist_item_id: i64,
    pub listing_id: i64,
    /// The user who owns the wantlist item.
    pub user_id: i64,
    pub confidence: Confidence,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWantlistReference {
    pub wantlist_item_id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub confidence: Confidence,
}

//-------------------------------------- InventorySnapshot ------------------------------------------------------------

/// A cache-resident snapshot of one seller's full inventory, tagged with its fetch time.
///
/// Freshness is judged against the snapshot's TTL class, which depends on the inventory size: refetching a huge
/// inventory is expensive, so large sellers get a longer lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub seller_name: String,
    pub listings: Vec<Listing>,
    pub fetched_at: DateTime<Utc>,
}

impl InventorySnapshot {
    pub fn item_count(&self) -> usize {
        self.listings.len()
    }

    pub fn is_large(&self, threshold: usize) -> bool {
        self.listings.len() >= threshold
    }
}

//--------------------------------------    UserHandle     ------------------------------------------------------------

/// The host application's link between a local user and their external catalog account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHandle {
    pub user_id: i64,
    pub username: String,
}

impl UserHandle {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self { user_id, username: username.into() }
    }
}

impl Display for UserHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.username, self.user_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn listing_status_round_trips() {
        for status in [ListingStatus::ForSale, ListingStatus::Sold, ListingStatus::Draft, ListingStatus::Expired] {
            assert_eq!(status.to_string().parse::<ListingStatus>().unwrap(), status);
        }
        assert!("Gone".parse::<ListingStatus>().is_err());
        assert_eq!(ListingStatus::from("Nonsense".to_string()), ListingStatus::Expired);
    }

    #[test]
    fn snapshot_size_classes() {
        let snapshot =
            InventorySnapshot { seller_name: "vinyl_vault".to_string(), listings: vec![], fetched_at: Utc::now() };
        assert_eq!(snapshot.item_count(), 0);
        assert!(!snapshot.is_large(1));
        assert!(snapshot.is_large(0));
    }
}
