//! Tabular export of parsed specifications
//!
//! - [`conversion`] - Aggregate to polars DataFrame in declared column order
//! - [`writer`] - CSV and Parquet files, one per device kind, plus a console preview

pub mod conversion;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use conversion::aggregate_to_dataframe;
pub use writer::{TableExporter, file_stem, sheet_title};
