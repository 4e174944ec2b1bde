//! Wantlist Matching Engine
//!
//! Core of the diggers group-buying service's wantlist feature: it mirrors a user's external wantlist, pulls the
//! inventories of the sellers that user is buying from, and pairs the two with a fuzzy similarity heuristic.
//!
//! The library is divided into three main sections:
//! 1. Storage and collaborator contracts ([`mod@traits`]). The engine never talks to a database or the catalog
//!    directly; it goes through [`WantlistManagement`], [`CatalogSource`] and [`SellerDirectory`] implementations.
//!    An in-memory backend ([`MemoryDatabase`]) ships with the crate.
//! 2. The caching and fetching layer ([`mod@cache`], [`InventoryFetcher`]). Seller inventories are cached at seller
//!    granularity with size-dependent TTL classes, so many users share one fetch.
//! 3. The public API ([`WantlistApi`], [`MatchingApi`]). Request/response operations over wantlist entities, and
//!    the per-user match pass.
//!
//! [`WantlistManagement`]: traits::WantlistManagement
//! [`CatalogSource`]: traits::CatalogSource
//! [`SellerDirectory`]: traits::SellerDirectory
pub mod cache;
mod config;
mod db;
pub mod db_types;
pub mod helpers;
mod inventory;
mod matching;
mod sources;
pub mod traits;
mod wle_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use cache::{Clock, SystemClock, TtlCache};
pub use config::EngineConfig;
pub use db::memory::MemoryDatabase;
pub use inventory::{FetchPolicy, FetchedInventory, InventoryError, InventoryFetcher};
pub use matching::scorer;
pub use wle_api::{
    errors::{MatchingApiError, WantlistApiError},
    match_objects,
    MatchingApi,
    WantlistApi,
};
