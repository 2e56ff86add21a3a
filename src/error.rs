//! Error handling for price processing operations.
//!
//! Fatal conditions (unreadable sources, missing columns, bad configuration)
//! are variants of [`PriceError`]. Reference mismatches, missing prices and
//! undefined metrics are not errors: they are counted in the stage reports or
//! carried as `None` values.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    #[error("Schema error during {stage}: {reason}")]
    Schema { stage: &'static str, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PriceError {
    pub fn source_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            stage,
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
