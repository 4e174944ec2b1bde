use chrono::{DateTime, Utc};
use discogs_tools::{ArtistRef, BasicInformation, FormatRef, InventoryListing, Price, ReleaseSummary, Want};

use crate::db_types::{Listing, NewWantlistItem, WantlistItem};

/// Deterministic timestamps: higher ids were added more recently.
fn epoch_date(id: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_600_000_000 + id * 86_400, 0).expect("valid fixture timestamp")
}

/// A wire-format inventory listing whose release id is guaranteed not to collide with fixture wantlist items.
pub fn listing_fixture(id: i64, title: &str, year: Option<i32>) -> InventoryListing {
    listing_fixture_for_release(id, 100_000 + id, title, year)
}

/// A wire-format inventory listing for a specific release id, for exercising the exact-release fast path.
pub fn listing_fixture_for_release(id: i64, release_id: i64, title: &str, year: Option<i32>) -> InventoryListing {
    InventoryListing {
        id,
        status: "For Sale".to_string(),
        condition: Some("Very Good Plus (VG+)".to_string()),
        sleeve_condition: Some("Very Good (VG)".to_string()),
        posted: Some(epoch_date(id)),
        uri: Some(format!("https://www.discogs.com/sell/item/{id}")),
        price: Price { value: 19.99, currency: "EUR".to_string() },
        release: ReleaseSummary {
            id: release_id,
            title: title.to_string(),
            artist: None,
            description: Some(title.to_string()),
            year,
            format: Some("LP".to_string()),
            thumbnail: None,
        },
    }
}

/// The domain form of [`listing_fixture`], attributed to the seller "vinyl_vault".
pub fn domain_listing(id: i64, title: &str, year: Option<i32>) -> Listing {
    Listing::from_inventory_listing("vinyl_vault", &listing_fixture(id, title, year))
}

/// A stored wantlist item. Its release id is the decimal form of `id`.
pub fn want_item(user_id: i64, id: i64, title: &str, artists: &[&str], year: Option<i32>) -> WantlistItem {
    WantlistItem {
        id,
        user_id,
        want_id: format!("w{id}"),
        release_id: id.to_string(),
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        year,
        format: Some("LP".to_string()),
        thumb_url: None,
        date_added: Some(epoch_date(id)),
        last_checked: Utc::now(),
        created_at: Utc::now(),
    }
}

/// The insert form of [`want_item`], for seeding a storage backend.
pub fn new_want_item(user_id: i64, id: i64, title: &str, artists: &[&str], year: Option<i32>) -> NewWantlistItem {
    NewWantlistItem {
        user_id,
        want_id: format!("w{id}"),
        release_id: id.to_string(),
        title: title.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        year,
        format: Some("LP".to_string()),
        thumb_url: None,
        date_added: Some(epoch_date(id)),
    }
}

/// A wire-format wantlist entry, as the catalog would return it during a sync. The want id doubles as the release
/// id, as it does on the real catalog.
pub fn want_fixture(id: i64, title: &str, artists: &[&str], year: Option<i32>) -> Want {
    Want {
        id,
        date_added: Some(epoch_date(id)),
        basic_information: BasicInformation {
            id,
            title: title.to_string(),
            year,
            artists: artists.iter().map(|a| ArtistRef { name: a.to_string() }).collect(),
            formats: vec![FormatRef { name: "Vinyl".to_string() }],
            thumb: None,
        },
    }
}
