//! Fakes and fixtures for exercising the engine without a live catalog.
mod clock;
mod fixtures;
mod mock_source;
pub mod prepare_env;

pub use clock::ManualClock;
pub use fixtures::{
    domain_listing,
    listing_fixture,
    listing_fixture_for_release,
    new_want_item,
    want_fixture,
    want_item,
};
pub use mock_source::{MockCatalogSource, StaticSellerDirectory};
pub use prepare_env::prepare_test_env;
