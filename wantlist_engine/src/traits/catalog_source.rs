use discogs_tools::{DiscogsApiError, InventoryPage, WantlistPage};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CatalogSourceError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
    #[error("Catalog rate limit reached. Wait {wait_secs}s")]
    RateLimited { wait_secs: u64 },
    #[error("Malformed catalog data: {0}")]
    Malformed(String),
}

impl From<DiscogsApiError> for CatalogSourceError {
    fn from(e: DiscogsApiError) -> Self {
        match e {
            DiscogsApiError::RateLimited { wait_secs } => CatalogSourceError::RateLimited { wait_secs },
            DiscogsApiError::JsonError(msg) => CatalogSourceError::Malformed(msg),
            other => CatalogSourceError::Unavailable(other.to_string()),
        }
    }
}

/// Read access to the external catalog: paginated seller inventories and user wantlists.
///
/// Implemented for [`discogs_tools::DiscogsApi`] in production; tests script a fake source instead.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn inventory_page(
        &self,
        seller_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<InventoryPage, CatalogSourceError>;

    async fn wantlist_page(&self, username: &str, page: u32, per_page: u32)
        -> Result<WantlistPage, CatalogSourceError>;
}
