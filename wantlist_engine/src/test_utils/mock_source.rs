use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use discogs_tools::{InventoryListing, InventoryPage, Pagination, Want, WantlistPage};

use crate::traits::{CatalogSource, CatalogSourceError, DirectoryError, SellerDirectory};

/// A scripted catalog: fixed inventories and wantlists, injectable failures, and fetch counters.
///
/// One "fetch" in the counters means one full inventory (or wantlist) pull, i.e. a request for page 1; follow-up
/// pages of the same pull are not counted separately.
#[derive(Debug, Clone, Default)]
pub struct MockCatalogSource {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    inventories: HashMap<String, Vec<InventoryListing>>,
    wantlists: HashMap<String, Vec<Want>>,
    failing_sellers: HashMap<String, CatalogSourceError>,
    inventory_fetches: HashMap<String, usize>,
    wantlist_fetches: HashMap<String, usize>,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_inventory(&self, seller_name: &str, listings: Vec<InventoryListing>) {
        self.lock().inventories.insert(seller_name.to_string(), listings);
    }

    pub fn set_wantlist(&self, username: &str, wants: Vec<Want>) {
        self.lock().wantlists.insert(username.to_string(), wants);
    }

    /// Make every inventory request for this seller fail with the given error until cleared.
    pub fn fail_seller(&self, seller_name: &str, error: CatalogSourceError) {
        self.lock().failing_sellers.insert(seller_name.to_string(), error);
    }

    pub fn clear_failure(&self, seller_name: &str) {
        self.lock().failing_sellers.remove(seller_name);
    }

    /// Number of full inventory pulls performed for this seller.
    pub fn inventory_fetches(&self, seller_name: &str) -> usize {
        self.lock().inventory_fetches.get(seller_name).copied().unwrap_or(0)
    }

    /// Number of full wantlist pulls performed for this user.
    pub fn wantlist_fetches(&self, username: &str) -> usize {
        self.lock().wantlist_fetches.get(username).copied().unwrap_or(0)
    }
}

fn page_count(total: usize, per_page: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (total as u32).div_ceil(per_page)
}

impl CatalogSource for MockCatalogSource {
    async fn inventory_page(
        &self,
        seller_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<InventoryPage, CatalogSourceError> {
        let mut inner = self.lock();
        if let Some(error) = inner.failing_sellers.get(seller_name) {
            return Err(error.clone());
        }
        if page == 1 {
            *inner.inventory_fetches.entry(seller_name.to_string()).or_insert(0) += 1;
        }
        let listings = inner.inventories.get(seller_name).cloned().unwrap_or_default();
        let start = ((page - 1) * per_page) as usize;
        let slice: Vec<InventoryListing> = listings.iter().skip(start).take(per_page as usize).cloned().collect();
        Ok(InventoryPage {
            pagination: Pagination {
                page,
                pages: page_count(listings.len(), per_page),
                per_page,
                items: listings.len() as u64,
            },
            listings: slice,
        })
    }

    async fn wantlist_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<WantlistPage, CatalogSourceError> {
        let mut inner = self.lock();
        if page == 1 {
            *inner.wantlist_fetches.entry(username.to_string()).or_insert(0) += 1;
        }
        let wants = inner.wantlists.get(username).cloned().unwrap_or_default();
        let start = ((page - 1) * per_page) as usize;
        let slice: Vec<Want> = wants.iter().skip(start).take(per_page as usize).cloned().collect();
        Ok(WantlistPage {
            pagination: Pagination {
                page,
                pages: page_count(wants.len(), per_page),
                per_page,
                items: wants.len() as u64,
            },
            wants: slice,
        })
    }
}

/// A fixed user → sellers mapping standing in for the host application's order/favorites directory.
#[derive(Debug, Clone, Default)]
pub struct StaticSellerDirectory {
    sellers: HashMap<i64, Vec<String>>,
}

impl StaticSellerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sellers(mut self, user_id: i64, sellers: &[&str]) -> Self {
        self.sellers.insert(user_id, sellers.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl SellerDirectory for StaticSellerDirectory {
    async fn registered_sellers_for_user(&self, user_id: i64) -> Result<Vec<String>, DirectoryError> {
        Ok(self.sellers.get(&user_id).cloned().unwrap_or_default())
    }
}
