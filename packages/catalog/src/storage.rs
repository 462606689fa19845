use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use vitrine_core::Product;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Reads the catalog file as a JSON array of products.
///
/// A missing file surfaces as `StorageError::Io` and an empty or malformed
/// file as `StorageError::Json`; the caller decides whether that is fatal.
pub async fn read_catalog_file(path: impl AsRef<Path>) -> StorageResult<Vec<Product>> {
    let path = path.as_ref();
    debug!("Reading catalog from: {:?}", path);

    let content = fs::read_to_string(path).await?;
    let products = serde_json::from_str::<Vec<Product>>(&content)?;

    debug!("Successfully read {} products", products.len());
    Ok(products)
}

/// Rewrites the whole catalog file with `products`
pub async fn write_catalog_file(path: impl AsRef<Path>, products: &[Product]) -> StorageResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating catalog directory: {:?}", parent);
            fs::create_dir_all(parent).await?;
        }
    }

    debug!("Writing catalog to: {:?}", path);
    let json_content = serde_json::to_string_pretty(products)?;
    fs::write(path, json_content).await?;

    debug!("Successfully wrote {} products to disk", products.len());
    Ok(())
}
