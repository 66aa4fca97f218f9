//! Positional parser for PVsyst component export lines
//!
//! PVsyst's component database exports one `;`-delimited line per inverter or
//! PV module. This module extracts the documented subset of fields from known
//! positions into typed specification records.
//!
//! ## Architecture
//!
//! - [`field_parsers`] - Token splitting, lookup and per-type coercion
//! - [`derivation`] - Frequency normalization, panel area and efficiency
//! - [`record_parser`] - One raw line to one typed record
//! - [`batch`] - Ordered sequential and concurrent batch parsing
//! - [`stats`] - Batch statistics and failure diagnostics
//!
//! ## Usage
//!
//! ```rust
//! use pvsyst_parser::models::PanelSpecification;
//! use pvsyst_parser::parser::BatchParser;
//!
//! let lines = ["0;Acme;AC-350;acme350.PAN;Manufacturer 2023;;;350"];
//! let result = BatchParser::default().parse_batch::<PanelSpecification, _, _>(lines);
//!
//! assert_eq!(result.record_count(), 1);
//! assert_eq!(result.aggregate.records()[0].nominal_power_w, 350.0);
//! ```

pub mod batch;
pub mod derivation;
pub mod field_parsers;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use batch::BatchParser;
pub use record_parser::RecordParser;
pub use stats::{BatchResult, ParseStats, RecordFailure};
