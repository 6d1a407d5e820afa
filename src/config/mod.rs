/// Seed catalog loading from catalog.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;

/// Listener, storage and identity settings from environment variables
pub mod server;
