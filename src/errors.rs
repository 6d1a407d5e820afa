//! Unified error type for the storefront.
//!
//! Storage adapters, the ledger and the configuration loaders all return
//! [`Result`]; the HTTP layer maps each variant onto a status code.

use thiserror::Error;

/// All failures the service can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before it reached the store (bad decimal, zero quantity, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the rejected input
        message: String,
    },

    /// A referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row that was looked up (e.g. `"user"`, `"product"`)
        entity: &'static str,
        /// Identifier that was requested
        id: i64,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Any SeaORM failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failure in the seed catalog
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Socket address in configuration could not be parsed
    #[error("Invalid bind address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Integer conversion overflowed
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
