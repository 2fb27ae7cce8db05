//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Only corrupt input surfaces here: invalid configuration, duplicate sampler keys,
//! composed keys or templates that cannot be resolved, and malformed item trees.
//! Thin data (too few spawn points, empty pools) is reported through
//! [`crate::loot::events`] and logging instead.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("duplicate sampler key '{key}'")]
    DuplicateKey { key: String },

    #[error("invalid weight {weight} for key '{key}'")]
    InvalidWeight { key: String, weight: f64 },

    #[error("composed key '{key}' does not resolve to an item in spawn point '{spawnpoint}'")]
    UnresolvedComposedKey { key: String, spawnpoint: String },

    #[error("unknown item template '{tpl}'")]
    UnknownTemplate { tpl: String },

    #[error("malformed item tree: {0}")]
    MalformedItemTree(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns `true` if the error points at corrupt map or item data rather than configuration.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Error::UnresolvedComposedKey { .. }
                | Error::UnknownTemplate { .. }
                | Error::MalformedItemTree(_)
        )
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
