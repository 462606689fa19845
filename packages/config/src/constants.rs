// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Vitrine

// Server Configuration
pub const VITRINE_PORT: &str = "VITRINE_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const VITRINE_HOST: &str = "VITRINE_HOST";

// Catalog Storage
pub const VITRINE_CATALOG_PATH: &str = "VITRINE_CATALOG_PATH";

// Static Assets
pub const VITRINE_STATIC_DIR: &str = "VITRINE_STATIC_DIR";

// CORS Configuration
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";

// Live Channel Configuration
pub const VITRINE_MAX_LIVE_CONNECTIONS_PER_IP: &str = "VITRINE_MAX_LIVE_CONNECTIONS_PER_IP";

// System Environment Variables
pub const HOME: &str = "HOME";
