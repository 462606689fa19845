use crate::storage::{self, StorageError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use vitrine_core::{Product, ProductCreateInput, ProductUpdateInput};

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("A product with code '{0}' already exists")]
    DuplicateCode(String),
    #[error("Product with ID {0} does not exist")]
    NotFound(u64),
    #[error("No product ids left after {0}")]
    IdsExhausted(u64),
    #[error("Failed to persist catalog: {0}")]
    Persistence(#[from] StorageError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

struct CatalogState {
    products: Vec<Product>,
    /// Highest id ever assigned by this store
    last_id: u64,
}

/// The authoritative product collection and its backing file.
///
/// Every mutation holds the state lock across the file write, so concurrent
/// callers are serialized and the file always matches memory after a
/// successful call. When a write fails the in-memory collection is left as
/// it was before the call.
pub struct CatalogStore {
    path: PathBuf,
    state: Mutex<CatalogState>,
}

impl CatalogStore {
    /// Loads the catalog from `path`.
    ///
    /// A missing, empty or unparseable file is reported and yields an empty
    /// catalog; it never fails.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let products = match storage::read_catalog_file(&path).await {
            Ok(products) if products.is_empty() => {
                warn!(path = ?path, "Catalog file has no products, starting with an empty catalog");
                Vec::new()
            }
            Ok(products) => {
                info!(path = ?path, count = products.len(), "Catalog file loaded");
                products
            }
            Err(e) => {
                warn!(
                    path = ?path,
                    error = %e,
                    "Catalog file missing or unreadable, starting with an empty catalog"
                );
                Vec::new()
            }
        };

        let last_id = products.iter().map(|p| p.id).max().unwrap_or(0);
        debug!(last_id, "Id counter initialized");

        Self {
            path,
            state: Mutex::new(CatalogState { products, last_id }),
        }
    }

    /// Path of the backing catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds a product, assigning it the next id
    pub async fn add_product(&self, input: ProductCreateInput) -> CatalogResult<Product> {
        let mut state = self.state.lock().await;

        if state.products.iter().any(|p| p.code == input.code) {
            info!(code = %input.code, "Rejected product with duplicate code");
            return Err(CatalogError::DuplicateCode(input.code));
        }

        let id = state
            .last_id
            .checked_add(1)
            .ok_or(CatalogError::IdsExhausted(state.last_id))?;
        // The id is consumed even if the write below fails, so it is never reused.
        state.last_id = id;
        let product = Product::new(id, input);

        let mut staged = state.products.clone();
        staged.push(product.clone());
        self.persist(&staged).await?;
        state.products = staged;

        info!("Created product '{}' with ID {}", product.title, product.id);
        Ok(product)
    }

    /// Applies a partial update to the product with `id`
    pub async fn update_product(
        &self,
        id: u64,
        input: ProductUpdateInput,
    ) -> CatalogResult<Product> {
        let mut state = self.state.lock().await;

        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        let mut staged = state.products.clone();
        apply_update(&mut staged[index], input);
        let updated = staged[index].clone();

        self.persist(&staged).await?;
        state.products = staged;

        info!("Updated product '{}' with ID {}", updated.title, updated.id);
        Ok(updated)
    }

    /// Removes the product with `id` and returns it
    pub async fn delete_product(&self, id: u64) -> CatalogResult<Product> {
        let mut state = self.state.lock().await;

        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        let mut staged = state.products.clone();
        let removed = staged.remove(index);

        self.persist(&staged).await?;
        state.products = staged;

        info!("Deleted product '{}' with ID {}", removed.title, removed.id);
        Ok(removed)
    }

    /// Snapshot of the whole catalog in insertion order
    pub async fn get_all(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    /// Looks up a product by id
    pub async fn get_by_id(&self, id: u64) -> Option<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Number of products in the catalog
    pub async fn len(&self) -> usize {
        self.state.lock().await.products.len()
    }

    /// Whether the catalog has no products
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Highest id assigned so far (0 for a fresh catalog)
    pub async fn last_assigned_id(&self) -> u64 {
        self.state.lock().await.last_id
    }

    async fn persist(&self, products: &[Product]) -> CatalogResult<()> {
        storage::write_catalog_file(&self.path, products)
            .await
            .map_err(|e| {
                error!(path = ?self.path, error = %e, "Failed to write catalog file");
                CatalogError::Persistence(e)
            })
    }
}

/// Merges `input` into `product`. A field replaces the stored value only
/// when it is present and non-empty (non-zero for numbers).
fn apply_update(product: &mut Product, input: ProductUpdateInput) {
    if let Some(title) = input.title.filter(|t| !t.is_empty()) {
        product.title = title;
    }
    if let Some(description) = input.description.filter(|d| !d.is_empty()) {
        product.description = description;
    }
    if let Some(price) = input.price.filter(|p| *p != 0.0) {
        product.price = price;
    }
    if let Some(stock) = input.stock.filter(|s| *s != 0) {
        product.stock = stock;
    }
    if let Some(category) = input.category.filter(|c| !c.is_empty()) {
        product.category = category;
    }
    if let Some(thumbnails) = input.thumbnails {
        product.thumbnails = thumbnails;
    }
    // Known quirk, kept until the product owner decides otherwise: a falsy
    // status (absent or `false`) resets the product to active, so an update
    // can never deactivate a product.
    product.status = input.status.filter(|s| *s).unwrap_or(true);
}
