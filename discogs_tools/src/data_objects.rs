use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//--------------------------------------    Pagination    -------------------------------------------------------------

/// Standard pagination envelope returned by every paginated catalog endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub items: u64,
}

//--------------------------------------      Price       -------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Price {
    pub value: f64,
    pub currency: String,
}

//--------------------------------------  ReleaseSummary  -------------------------------------------------------------

/// The release block embedded in a marketplace listing. `description` is the display string the marketplace shows
/// ("Artist - Title (Format)"); `artist` and `title` are the split fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReleaseSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ReleaseSummary {
    /// The combined "Artist - Title" display string for this release. Falls back to assembling one from the split
    /// fields when the marketplace omits `description`.
    pub fn display_title(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        match &self.artist {
            Some(artist) => format!("{artist} - {}", self.title),
            None => self.title.clone(),
        }
    }
}

//-------------------------------------- InventoryListing -------------------------------------------------------------

/// One for-sale item in a seller's inventory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryListing {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub sleeve_condition: Option<String>,
    #[serde(default)]
    pub posted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uri: Option<String>,
    pub price: Price,
    pub release: ReleaseSummary,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryPage {
    pub pagination: Pagination,
    #[serde(default)]
    pub listings: Vec<InventoryListing>,
}

//--------------------------------------      Wantlist     ------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormatRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BasicInformation {
    /// The release id.
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub formats: Vec<FormatRef>,
    #[serde(default)]
    pub thumb: Option<String>,
}

impl BasicInformation {
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }

    pub fn format_summary(&self) -> Option<String> {
        if self.formats.is_empty() {
            return None;
        }
        Some(self.formats.iter().map(|f| f.name.as_str()).collect::<Vec<&str>>().join(", "))
    }
}

/// One entry in a user's wantlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Want {
    pub id: i64,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    pub basic_information: BasicInformation,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WantlistPage {
    pub pagination: Pagination,
    #[serde(default)]
    pub wants: Vec<Want>,
}

//--------------------------------------    UserProfile    ------------------------------------------------------------

/// Public profile of a catalog user. The rating field has gone by several names across API revisions, hence the
/// aliases.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "seller_rating_avg", alias = "marketplace_rating")]
    pub seller_rating: Option<f64>,
    #[serde(default)]
    pub num_for_sale: Option<u64>,
}

//-------------------------------------- MarketplaceListing -----------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SellerRef {
    pub username: String,
}

/// A single marketplace listing fetched by id, as used when a buyer pastes a listing URL into an order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketplaceListing {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub sleeve_condition: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub seller: Option<SellerRef>,
    pub release: ReleaseSummary,
    #[serde(default)]
    pub uri: Option<String>,
}
