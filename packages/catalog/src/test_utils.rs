//! Test utilities for building throwaway catalogs

pub mod test_helpers {
    use crate::storage::write_catalog_file;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use vitrine_core::{Product, ProductCreateInput};

    /// Creates a temporary directory and the path of a (not yet existing)
    /// catalog file inside it. Keep the `TempDir` alive for the test's duration.
    pub fn temp_catalog() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("products.json");
        (temp_dir, path)
    }

    /// Writes `products` to `path` as a catalog file
    pub async fn seed_catalog(path: &Path, products: &[Product]) {
        write_catalog_file(path, products).await.unwrap();
    }

    /// A fully populated product with the given id and code
    pub fn sample_product(id: u64, code: &str) -> Product {
        Product {
            id,
            title: format!("Product {}", code),
            description: format!("Description of {}", code),
            code: code.to_string(),
            price: 9.99,
            status: true,
            stock: 5,
            category: "general".to_string(),
            thumbnails: vec![format!("/static/img/{}.png", code)],
        }
    }

    /// Creation input for a product with the given code
    pub fn product_input(code: &str) -> ProductCreateInput {
        ProductCreateInput {
            title: format!("Product {}", code),
            description: format!("Description of {}", code),
            code: code.to_string(),
            price: 9.99,
            stock: 5,
            category: "general".to_string(),
            ..Default::default()
        }
    }
}
