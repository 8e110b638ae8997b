//! Error types surfaced by the core crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The catalog text is not a JSON array of game records.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two records share the same identifier.
    #[error("duplicate game id {id} ({first:?} and {second:?})")]
    DuplicateId {
        /// Identifier seen twice.
        id: u32,
        /// Title of the first record with that id.
        first: String,
        /// Title of the second record with that id.
        second: String,
    },
}

/// Failures while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered configuration could not be built or deserialized.
    #[error("invalid configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    /// The default configuration file could not be written.
    #[error("failed to write default config {path}")]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A setting parsed but holds an unusable value.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Offending configuration key.
        key: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}
