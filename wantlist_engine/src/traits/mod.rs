//! Interface contracts between the engine and its collaborators.
//!
//! * [`WantlistManagement`] is the storage backend contract for wantlist items and references. The engine ships an
//!   in-memory implementation ([`crate::MemoryDatabase`]); the host application may substitute its own.
//! * [`CatalogSource`] abstracts the external catalog API (paginated inventories and wantlists), so the matching
//!   pipeline can be exercised against a scripted source in tests.
//! * [`SellerDirectory`] is supplied by the host application and answers "which sellers are relevant to user X",
//!   typically the sellers appearing in the user's active group orders and favorites.
mod catalog_source;
mod seller_directory;
mod wantlist_management;

pub use catalog_source::{CatalogSource, CatalogSourceError};
pub use seller_directory::{DirectoryError, SellerDirectory};
pub use wantlist_management::{WantlistManagement, WantlistStoreError};
