// ABOUTME: Server assembly and configuration for the vitrine binary
// ABOUTME: Reads the environment, loads the catalog and serves the API with live sync

pub mod config;
pub mod error;
pub mod logging;
pub mod server;
