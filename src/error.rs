//! Typed errors surfaced by the library.
//!
//! Loading failures are not fatal: [`crate::store::DataStore::load`] turns a
//! [`DataLoadError`] into a user-facing warning and an empty table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid Year value `{value}`")]
    InvalidYear { row: usize, value: String },

    #[error("row {row}, column `{column}`: invalid number `{value}`")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {message}")]
    Invalid { message: String },
}
