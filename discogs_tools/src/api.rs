use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    config::DiscogsConfig,
    data_objects::{InventoryPage, MarketplaceListing, UserProfile, WantlistPage},
    DiscogsApiError,
    RateLimiter,
};

/// Typed client for the Discogs catalog and marketplace API.
///
/// All requests are plain REST GETs authenticated with a personal access token. Every call passes through the
/// client-side [`RateLimiter`] before any I/O happens, and an HTTP 429 from the provider maps onto the same
/// [`DiscogsApiError::RateLimited`] variant, so callers only have one rate-limit shape to handle.
#[derive(Clone)]
pub struct DiscogsApi {
    config: DiscogsConfig,
    client: Arc<Client>,
    limiter: Arc<RateLimiter>,
}

impl DiscogsApi {
    pub fn new(config: DiscogsConfig) -> Result<Self, DiscogsApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let token = config.token.reveal();
        if !token.is_empty() {
            let val = HeaderValue::from_str(&format!("Discogs token={token}"))
                .map_err(|e| DiscogsApiError::Initialization(e.to_string()))?;
            headers.insert("Authorization", val);
        }
        let currency = HeaderValue::from_str(config.currency.as_str())
            .map_err(|e| DiscogsApiError::Initialization(e.to_string()))?;
        headers.insert("Accept-Currency", currency);
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| DiscogsApiError::Initialization(e.to_string()))?;
        let limiter = Arc::new(RateLimiter::new(config.max_calls_per_minute));
        Ok(Self { config, client: Arc::new(client), limiter })
    }

    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, DiscogsApiError> {
        self.limiter.check()?;
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.get(url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| DiscogsApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            return response.json::<T>().await.map_err(|e| DiscogsApiError::JsonError(e.to_string()));
        }
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let wait_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            warn!("Catalog API returned 429; retry after {wait_secs}s");
            return Err(DiscogsApiError::RateLimited { wait_secs });
        }
        let status = response.status().as_u16();
        let message = response.text().await.map_err(|e| DiscogsApiError::RestResponseError(e.to_string()))?;
        Err(DiscogsApiError::QueryError { status, message })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base)
    }

    /// Fetch one page of a seller's for-sale inventory, in the seller's listing order.
    pub async fn fetch_inventory_page(
        &self,
        seller_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<InventoryPage, DiscogsApiError> {
        let path = format!("/users/{seller_name}/inventory");
        debug!("Fetching inventory page {page} for seller {seller_name}");
        let params = [("page", page.to_string()), ("per_page", per_page.to_string()), ("status", "For Sale".to_string())];
        let result = self.rest_query::<InventoryPage>(&path, &params).await?;
        debug!(
            "Fetched inventory page {page}/{} for {seller_name} ({} listings of {})",
            result.pagination.pages,
            result.listings.len(),
            result.pagination.items
        );
        Ok(result)
    }

    /// Fetch one page of a user's wantlist.
    pub async fn fetch_wantlist_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<WantlistPage, DiscogsApiError> {
        let path = format!("/users/{username}/wants");
        debug!("Fetching wantlist page {page} for {username}");
        let params = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let result = self.rest_query::<WantlistPage>(&path, &params).await?;
        debug!("Fetched wantlist page {page}/{} for {username}", result.pagination.pages);
        Ok(result)
    }

    /// Fetch the public profile of a catalog user (sellers included).
    pub async fn fetch_user_profile(&self, username: &str) -> Result<UserProfile, DiscogsApiError> {
        let path = format!("/users/{username}");
        debug!("Fetching profile for {username}");
        let result = self.rest_query::<UserProfile>(&path, &[]).await?;
        info!("Fetched profile for {username}");
        Ok(result)
    }

    /// Fetch a single marketplace listing by id.
    pub async fn fetch_listing(&self, listing_id: i64) -> Result<MarketplaceListing, DiscogsApiError> {
        let path = format!("/marketplace/listings/{listing_id}");
        debug!("Fetching listing #{listing_id}");
        let result = self.rest_query::<MarketplaceListing>(&path, &[]).await?;
        info!("Fetched listing #{listing_id}");
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_urls_against_the_configured_base() {
        let config = DiscogsConfig { api_base: "https://api.example.test".to_string(), ..DiscogsConfig::default() };
        let api = DiscogsApi::new(config).unwrap();
        assert_eq!(api.url("/users/vinyl_vault/inventory"), "https://api.example.test/users/vinyl_vault/inventory");
    }

    #[test]
    fn client_initializes_without_a_token() {
        let api = DiscogsApi::new(DiscogsConfig::default());
        assert!(api.is_ok());
    }
}
