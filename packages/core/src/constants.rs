use std::env;
use std::path::PathBuf;
use vitrine_config::HOME;

/// File name of the persisted catalog inside the Vitrine directory
pub const CATALOG_FILE_NAME: &str = "products.json";

/// Get the path to the Vitrine directory (~/.vitrine)
pub fn vitrine_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var(HOME) {
        PathBuf::from(home).join(".vitrine")
    } else {
        // Fall back to dirs crate, then the working directory
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitrine")
    }
}

/// Get the default path of the catalog file (~/.vitrine/products.json)
pub fn catalog_file() -> PathBuf {
    vitrine_dir().join(CATALOG_FILE_NAME)
}
