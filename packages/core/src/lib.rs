// ABOUTME: Core types and path constants for Vitrine
// ABOUTME: Foundational package providing the product model shared by every other package

pub mod constants;
pub mod types;

// Re-export main types
pub use types::{Product, ProductCreateInput, ProductUpdateInput};

// Re-export constants
pub use constants::{catalog_file, vitrine_dir, CATALOG_FILE_NAME};
