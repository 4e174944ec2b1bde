mod api;
mod config;
mod error;
mod rate_limit;

mod data_objects;
mod helpers;

pub use api::DiscogsApi;
pub use config::DiscogsConfig;
pub use data_objects::{
    ArtistRef,
    BasicInformation,
    FormatRef,
    InventoryListing,
    InventoryPage,
    MarketplaceListing,
    Pagination,
    Price,
    ReleaseSummary,
    SellerRef,
    UserProfile,
    Want,
    WantlistPage,
};
pub use error::DiscogsApiError;
pub use helpers::extract_listing_id;
pub use rate_limit::RateLimiter;
