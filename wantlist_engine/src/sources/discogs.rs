use discogs_tools::{DiscogsApi, InventoryPage, WantlistPage};

use crate::traits::{CatalogSource, CatalogSourceError};

impl CatalogSource for DiscogsApi {
    async fn inventory_page(
        &self,
        seller_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<InventoryPage, CatalogSourceError> {
        Ok(self.fetch_inventory_page(seller_name, page, per_page).await?)
    }

    async fn wantlist_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<WantlistPage, CatalogSourceError> {
        Ok(self.fetch_wantlist_page(username, page, per_page).await?)
    }
}
