use std::env;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;
use vitrine_api::DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP;
use vitrine_config::{
    CORS_ORIGIN, PORT, VITRINE_CATALOG_PATH, VITRINE_HOST, VITRINE_MAX_LIVE_CONNECTIONS_PER_IP,
    VITRINE_PORT, VITRINE_STATIC_DIR,
};

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(#[from] AddrParseError),
    #[error("Invalid live connection limit: {0}")]
    InvalidConnectionLimit(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub cors_origin: String,
    pub max_live_connections_per_ip: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var(VITRINE_PORT).or_else(|_| env::var(PORT)) {
            Ok(port_str) => port_str.trim().parse::<u16>()?,
            Err(_) => DEFAULT_PORT,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = match env::var(VITRINE_HOST) {
            Ok(host) => host.trim().parse::<IpAddr>()?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let catalog_path = env::var(VITRINE_CATALOG_PATH)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(vitrine_core::catalog_file);

        let static_dir = env::var(VITRINE_STATIC_DIR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cors_origin = env::var(CORS_ORIGIN).unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let max_live_connections_per_ip = match env::var(VITRINE_MAX_LIVE_CONNECTIONS_PER_IP) {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&v| v > 0 && v <= 1000)
                .ok_or(ConfigError::InvalidConnectionLimit(value))?,
            Err(_) => DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP,
        };

        Ok(Config {
            host,
            port,
            catalog_path,
            static_dir,
            cors_origin,
            max_live_connections_per_ip,
        })
    }

    /// Applies command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        port: Option<u16>,
        host: Option<IpAddr>,
        catalog_path: Option<PathBuf>,
        static_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = port {
            if port == 0 {
                return Err(ConfigError::PortOutOfRange(port));
            }
            self.port = port;
        }
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(catalog_path) = catalog_path {
            self.catalog_path = catalog_path;
        }
        if static_dir.is_some() {
            self.static_dir = static_dir;
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
