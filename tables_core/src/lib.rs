mod area;
mod config;
mod registry;
mod table;

pub use area::{Area, AreaTable};
pub use registry::TableRegistry;
pub use table::{Entry, Table, Weighted};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading table configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error rolling or converting a table
#[derive(Debug, Error)]
pub enum RollError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Table '{0}' has no entries")]
    EmptyTable(String),
    #[error("Invalid entry '{entry}' in table '{table}'")]
    InvalidEntry { table: String, entry: String },
}
