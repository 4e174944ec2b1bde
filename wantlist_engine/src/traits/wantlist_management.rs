use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{NewWantlistItem, NewWantlistReference, WantlistItem, WantlistReference};

#[derive(Debug, Clone, Error)]
pub enum WantlistStoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// The `WantlistManagement` trait defines the storage contract for wantlist items and their references.
///
/// Uniqueness rules the backend must uphold:
/// * one wantlist item per (user_id, want_id): upserts refresh the existing row;
/// * one reference per (wantlist_item_id, listing_id): upserts refresh the confidence, never duplicate.
#[allow(async_fn_in_trait)]
pub trait WantlistManagement {
    /// Insert the item, or refresh the existing row for the same (user, want id). `last_checked` is bumped either
    /// way.
    async fn upsert_wantlist_item(&self, item: NewWantlistItem) -> Result<WantlistItem, WantlistStoreError>;

    /// All wantlist items for the user, most recently added (on the external catalog) first.
    async fn wantlist_for_user(&self, user_id: i64) -> Result<Vec<WantlistItem>, WantlistStoreError>;

    /// The most recent `last_checked` across the user's items, or `None` for an empty wantlist.
    async fn latest_check_for_user(&self, user_id: i64) -> Result<Option<DateTime<Utc>>, WantlistStoreError>;

    /// Owner-checked delete. Removes the item's references as well.
    async fn delete_wantlist_item(&self, user_id: i64, item_id: i64) -> Result<(), WantlistStoreError>;

    /// Insert the reference, or refresh the confidence of the existing (item, listing) link.
    async fn upsert_reference(&self, reference: NewWantlistReference)
        -> Result<WantlistReference, WantlistStoreError>;

    /// All references for the user, newest first.
    async fn references_for_user(&self, user_id: i64) -> Result<Vec<WantlistReference>, WantlistStoreError>;

    /// Owner-checked delete of a single reference.
    async fn delete_reference(&self, user_id: i64, reference_id: i64) -> Result<(), WantlistStoreError>;

    /// Delete every reference created before `cutoff`, across all users. Returns the number deleted.
    async fn delete_references_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, WantlistStoreError>;
}
