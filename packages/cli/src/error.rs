use crate::config::ConfigError;
use thiserror::Error;

/// Errors that stop the server or a command before it can do its work
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] vitrine_catalog::CatalogError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for server and command entry points
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let error: AppError = ConfigError::PortOutOfRange(0).into();
        assert!(matches!(error, AppError::Configuration(_)));
        assert!(error.to_string().contains("out of valid range"));
    }

    #[test]
    fn test_catalog_error_message_kept() {
        let error: AppError = vitrine_catalog::CatalogError::NotFound(5).into();
        assert_eq!(
            error.to_string(),
            "Catalog error: Product with ID 5 does not exist"
        );
    }
}
