// ABOUTME: Shared configuration vocabulary for Vitrine packages
// ABOUTME: Every environment variable the server reads is named here

pub mod constants;

pub use constants::*;
