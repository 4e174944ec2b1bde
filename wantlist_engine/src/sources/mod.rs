//! Production implementations of the [`crate::traits::CatalogSource`] contract.
mod discogs;
