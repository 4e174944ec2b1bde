use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Supplies the set of sellers relevant to a user: the sellers behind the user's active group orders plus any
/// favorites. The host application owns this data; the engine only consumes it.
#[allow(async_fn_in_trait)]
pub trait SellerDirectory {
    /// Seller names relevant to the user, possibly with duplicates (the engine deduplicates).
    async fn registered_sellers_for_user(&self, user_id: i64) -> Result<Vec<String>, DirectoryError>;
}
