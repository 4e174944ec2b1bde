use thiserror::Error;

use crate::traits::{CatalogSourceError, DirectoryError, WantlistStoreError};

#[derive(Debug, Error)]
pub enum WantlistApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] WantlistStoreError),
    #[error("Catalog source error: {0}")]
    Source(#[from] CatalogSourceError),
}

#[derive(Debug, Error)]
pub enum MatchingApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] WantlistStoreError),
    #[error("Seller directory error: {0}")]
    Directory(#[from] DirectoryError),
}
