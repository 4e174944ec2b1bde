use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{NewWantlistItem, NewWantlistReference, WantlistItem, WantlistReference},
    traits::{WantlistManagement, WantlistStoreError},
};

/// In-memory implementation of [`WantlistManagement`].
///
/// Clones share the same underlying store, in the same way a pooled database handle would.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_item_id: i64,
    next_reference_id: i64,
    items: Vec<WantlistItem>,
    references: Vec<WantlistReference>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WantlistManagement for MemoryDatabase {
    async fn upsert_wantlist_item(&self, item: NewWantlistItem) -> Result<WantlistItem, WantlistStoreError> {
        let now = Utc::now();
        let mut inner = self.lock();
        if let Some(existing) =
            inner.items.iter_mut().find(|i| i.user_id == item.user_id && i.want_id == item.want_id)
        {
            existing.release_id = item.release_id;
            existing.title = item.title;
            existing.artists = item.artists;
            existing.year = item.year;
            existing.format = item.format;
            existing.thumb_url = item.thumb_url;
            existing.date_added = item.date_added.or(existing.date_added);
            existing.last_checked = now;
            return Ok(existing.clone());
        }
        inner.next_item_id += 1;
        let row = WantlistItem {
            id: inner.next_item_id,
            user_id: item.user_id,
            want_id: item.want_id,
            release_id: item.release_id,
            title: item.title,
            artists: item.artists,
            year: item.year,
            format: item.format,
            thumb_url: item.thumb_url,
            date_added: item.date_added,
            last_checked: now,
            created_at: now,
        };
        inner.items.push(row.clone());
        Ok(row)
    }

    async fn wantlist_for_user(&self, user_id: i64) -> Result<Vec<WantlistItem>, WantlistStoreError> {
        let inner = self.lock();
        let mut items: Vec<WantlistItem> = inner.items.iter().filter(|i| i.user_id == user_id).cloned().collect();
        items.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(items)
    }

    async fn latest_check_for_user(&self, user_id: i64) -> Result<Option<DateTime<Utc>>, WantlistStoreError> {
        let inner = self.lock();
        Ok(inner.items.iter().filter(|i| i.user_id == user_id).map(|i| i.last_checked).max())
    }

    async fn delete_wantlist_item(&self, user_id: i64, item_id: i64) -> Result<(), WantlistStoreError> {
        let mut inner = self.lock();
        let pos = inner
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| WantlistStoreError::NotFound(format!("wantlist item #{item_id}")))?;
        if inner.items[pos].user_id != user_id {
            return Err(WantlistStoreError::PermissionDenied(format!(
                "wantlist item #{item_id} does not belong to user #{user_id}"
            )));
        }
        inner.items.remove(pos);
        let before = inner.references.len();
        inner.references.retain(|r| r.wantlist_item_id != item_id);
        debug!("Deleted wantlist item #{item_id} and {} of its references", before - inner.references.len());
        Ok(())
    }

    async fn upsert_reference(
        &self,
        reference: NewWantlistReference,
    ) -> Result<WantlistReference, WantlistStoreError> {
        let mut inner = self.lock();
        if let Some(existing) = inner
            .references
            .iter_mut()
            .find(|r| r.wantlist_item_id == reference.wantlist_item_id && r.listing_id == reference.listing_id)
        {
            existing.confidence = reference.confidence;
            return Ok(existing.clone());
        }
        inner.next_reference_id += 1;
        let row = WantlistReference {
            id: inner.next_reference_id,
            wantlist_item_id: reference.wantlist_item_id,
            listing_id: reference.listing_id,
            user_id: reference.user_id,
            confidence: reference.confidence,
            created_at: Utc::now(),
        };
        inner.references.push(row.clone());
        Ok(row)
    }

    async fn references_for_user(&self, user_id: i64) -> Result<Vec<WantlistReference>, WantlistStoreError> {
        let inner = self.lock();
        let mut refs: Vec<WantlistReference> =
            inner.references.iter().filter(|r| r.user_id == user_id).cloned().collect();
        refs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(refs)
    }

    async fn delete_reference(&self, user_id: i64, reference_id: i64) -> Result<(), WantlistStoreError> {
        let mut inner = self.lock();
        let pos = inner
            .references
            .iter()
            .position(|r| r.id == reference_id)
            .ok_or_else(|| WantlistStoreError::NotFound(format!("reference #{reference_id}")))?;
        if inner.references[pos].user_id != user_id {
            return Err(WantlistStoreError::PermissionDenied(format!(
                "reference #{reference_id} does not belong to user #{user_id}"
            )));
        }
        inner.references.remove(pos);
        Ok(())
    }

    async fn delete_references_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, WantlistStoreError> {
        let mut inner = self.lock();
        let before = inner.references.len();
        inner.references.retain(|r| r.created_at >= cutoff);
        let deleted = before - inner.references.len();
        if deleted > 0 {
            info!("Cleaned up {deleted} references older than {cutoff}");
        }
        Ok(deleted)
    }
}
