//! PVsyst Component Parser Library
//!
//! Extracts typed inverter and PV module specifications from the
//! `;`-delimited lines exported by PVsyst's component database and
//! consolidates them into tabular files.
//!
//! This library provides tools for:
//! - Extracting a fixed set of fields from known positions with per-type defaults
//! - Normalizing inverter frequency ratings and deriving module area and efficiency
//! - Parsing batches in submission order, sequentially or concurrently
//! - Writing consolidated CSV and Parquet tables in a declared column order

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod schema;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use aggregate::Aggregate;
pub use config::{AppConfig, CoercionPolicy, ParserConfig};
pub use error::{PvsystError, Result};
pub use models::{DeviceKind, InverterSpecification, PanelSpecification, ParsedRecord, Specification};
pub use parser::{BatchParser, RecordParser};
