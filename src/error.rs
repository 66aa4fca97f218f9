//! Error handling for component record parsing and export.
//!
//! Provides error types with enough context to tell the caller which record
//! field failed coercion, and why an export could not be written.

use crate::models::DeviceKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PvsystError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Malformed value for {field} (position {position}): '{value}' is not a valid {expected}")]
    MalformedField {
        field: &'static str,
        position: usize,
        value: String,
        expected: &'static str,
    },

    #[error("Field {field} missing from extracted record")]
    MissingField { field: &'static str },

    #[error("No {kind} records to export")]
    EmptyBatch { kind: DeviceKind },

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export failed for {}: {reason}", path.display())]
    ExportFailed { path: PathBuf, reason: String },

    #[error("Parse task for record {index} failed: {reason}")]
    TaskFailed { index: usize, reason: String },
}

impl PvsystError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for errors caused by the content of a single record
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedField { .. } | Self::MissingField { .. } | Self::TaskFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PvsystError>;
