//! Confidence scoring between one wantlist item and one listing.
//!
//! The score is a weighted sum of three components: title similarity (0.60), artist presence (0.30) and year
//! proximity (0.10). The artist component is binary substring presence, not proportional similarity. It is coarse
//! (reordered or abbreviated artist names miss; short common names can false-positive), but the 0.70 acceptance
//! threshold downstream was calibrated against exactly this shape, so the weights and component forms must change
//! together or not at all.

use diggers_common::Confidence;

use crate::{
    db_types::{Listing, WantlistItem},
    helpers::{extract_year, normalize_title},
};

pub const TITLE_WEIGHT: f64 = 0.60;
pub const ARTIST_WEIGHT: f64 = 0.30;
pub const YEAR_WEIGHT: f64 = 0.10;

/// Scores how likely `listing` is the release the user wants. Pure and case-insensitive; missing data downgrades
/// the affected component to 0 instead of failing.
pub fn score(item: &WantlistItem, listing: &Listing) -> Confidence {
    let title = title_similarity(&item.title, &listing.title);
    let artist = if artist_appears_in_title(&item.artists, &listing.title) { 1.0 } else { 0.0 };
    let year = if years_align(item.year, listing_year(listing)) { 1.0 } else { 0.0 };
    Confidence::new(TITLE_WEIGHT * title + ARTIST_WEIGHT * artist + YEAR_WEIGHT * year)
}

/// Normalized similarity ratio between two titles, in [0, 1]. Sørensen–Dice over character bigrams, after
/// lowercasing and stripping punctuation, so "Blue Train" scores well against "John Coltrane - Blue Train (LP)".
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::sorensen_dice(&a, &b)
}

pub(crate) fn artist_appears_in_title(artists: &[String], listing_title: &str) -> bool {
    let haystack = listing_title.to_lowercase();
    artists.iter().any(|artist| {
        let needle = artist.trim().to_lowercase();
        !needle.is_empty() && haystack.contains(&needle)
    })
}

pub(crate) fn years_align(want_year: Option<i32>, listing_year: Option<i32>) -> bool {
    match (want_year, listing_year) {
        (Some(w), Some(l)) => (w - l).abs() <= 1,
        _ => false,
    }
}

/// A listing's release year: the catalog field when present, otherwise a four-digit year found in the title.
pub(crate) fn listing_year(listing: &Listing) -> Option<i32> {
    listing.year.or_else(|| extract_year(&listing.title))
}
