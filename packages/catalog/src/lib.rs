// ABOUTME: Product catalog store with JSON file persistence
// ABOUTME: Owns the in-memory product list, assigns ids and rewrites the catalog file on every change

pub mod storage;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use storage::{read_catalog_file, write_catalog_file, StorageError, StorageResult};
pub use store::{CatalogError, CatalogResult, CatalogStore};

// Re-export the product model so callers only need this crate
pub use vitrine_core::{Product, ProductCreateInput, ProductUpdateInput};
