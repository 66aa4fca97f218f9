//! Configuration management and validation.
//!
//! Provides the parser's coercion policies and the export settings, loaded
//! from an optional TOML file and then overridden from the command line.

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_OUTPUT_DIR};
use crate::error::{PvsystError, Result};
use crate::schema::{INVERTER_SCHEMA, PANEL_SCHEMA, SemanticType};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happens when a present, non-empty token cannot be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Reject the whole record
    Strict,
    /// Fall back to the field default
    Lenient,
}

/// Record extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Policy for float fields
    pub float_policy: CoercionPolicy,

    /// Policy for integer fields (cell counts)
    pub integer_policy: CoercionPolicy,

    /// Policy for the inverter frequency field
    pub frequency_policy: CoercionPolicy,

    /// Maximum records parsed at once by the concurrent batch path
    pub max_concurrent_records: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            float_policy: CoercionPolicy::Strict,
            integer_policy: CoercionPolicy::Lenient,
            frequency_policy: CoercionPolicy::Lenient,
            max_concurrent_records: num_cpus::get(),
        }
    }
}

impl ParserConfig {
    /// Policy in force for a semantic type; strings never fail
    pub fn policy_for(&self, semantic_type: SemanticType) -> CoercionPolicy {
        match semantic_type {
            SemanticType::String => CoercionPolicy::Lenient,
            SemanticType::Float => self.float_policy,
            SemanticType::Integer => self.integer_policy,
            SemanticType::Frequency => self.frequency_policy,
        }
    }

    pub fn with_float_policy(mut self, policy: CoercionPolicy) -> Self {
        self.float_policy = policy;
        self
    }

    pub fn with_integer_policy(mut self, policy: CoercionPolicy) -> Self {
        self.integer_policy = policy;
        self
    }

    pub fn with_frequency_policy(mut self, policy: CoercionPolicy) -> Self {
        self.frequency_policy = policy;
        self
    }

    pub fn with_max_concurrent_records(mut self, limit: usize) -> Self {
        self.max_concurrent_records = limit;
        self
    }
}

/// Output file formats for consolidated tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One workbook per kind with a single named sheet
    Xlsx,
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse a CLI compression name
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(PvsystError::configuration(format!(
                "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                other
            ))),
        }
    }
}

/// Consolidated table output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the consolidated files are written to
    pub output_dir: PathBuf,

    /// Formats written per device kind
    pub formats: Vec<ExportFormat>,

    /// Parquet compression
    pub compression: CompressionAlgorithm,

    /// Print the consolidated table after export
    pub preview: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            formats: vec![ExportFormat::Xlsx],
            compression: CompressionAlgorithm::Snappy,
            preview: true,
        }
    }
}

impl ExportConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn without_preview(mut self) -> Self {
        self.preview = false;
        self
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub parser: ParserConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Default location: `<config_dir>/pvsyst-parser/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            PvsystError::configuration("Could not determine user config directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PvsystError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| PvsystError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Explicit file, then the default location if it exists, then defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject settings the parser or exporter cannot run with
    pub fn validate(&self) -> Result<()> {
        INVERTER_SCHEMA.validate()?;
        PANEL_SCHEMA.validate()?;

        if self.parser.max_concurrent_records == 0 {
            return Err(PvsystError::configuration(
                "max_concurrent_records must be at least 1",
            ));
        }
        if self.export.formats.is_empty() {
            return Err(PvsystError::configuration(
                "At least one export format is required",
            ));
        }
        Ok(())
    }
}
