//! Consolidated table writer
//!
//! Writes one file per device kind and format into the configured output
//! directory, in the declared column order. Xlsx workbooks hold a single
//! sheet named after the kind.

use crate::aggregate::Aggregate;
use crate::config::{ExportConfig, ExportFormat};
use crate::constants::{INVERTER_FILE_STEM, INVERTER_SHEET_TITLE, PANEL_FILE_STEM, PANEL_SHEET_TITLE};
use crate::error::{PvsystError, Result};
use crate::models::{DeviceKind, FieldValue, Specification};

use super::conversion::{aggregate_to_dataframe, display_value};
use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File stem of the consolidated table for a kind
pub fn file_stem(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Inverter => INVERTER_FILE_STEM,
        DeviceKind::Panel => PANEL_FILE_STEM,
    }
}

/// Title of the consolidated table for a kind
pub fn sheet_title(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Inverter => INVERTER_SHEET_TITLE,
        DeviceKind::Panel => PANEL_SHEET_TITLE,
    }
}

/// Writer for consolidated specification tables
#[derive(Debug, Clone, Default)]
pub struct TableExporter {
    config: ExportConfig,
}

impl TableExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Destination of one kind's table in one format
    pub fn output_path(&self, kind: DeviceKind, format: ExportFormat) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.{}", file_stem(kind), format.extension()))
    }

    /// Build the consolidated DataFrame without writing it
    pub fn to_dataframe<T: Specification>(&self, aggregate: &Aggregate<T>) -> Result<DataFrame> {
        aggregate_to_dataframe(aggregate)
    }

    /// Write the aggregate in every configured format, returning the written paths
    pub fn export<T: Specification>(&self, aggregate: &Aggregate<T>) -> Result<Vec<PathBuf>> {
        if aggregate.is_empty() {
            return Err(PvsystError::EmptyBatch { kind: T::KIND });
        }

        std::fs::create_dir_all(&self.config.output_dir)?;
        let mut df = self.to_dataframe(aggregate)?;

        let mut written = Vec::with_capacity(self.config.formats.len());
        for format in &self.config.formats {
            let path = self.output_path(T::KIND, *format);
            match format {
                ExportFormat::Xlsx => self.write_xlsx(aggregate, &path)?,
                ExportFormat::Csv => self.write_csv(&mut df, &path)?,
                ExportFormat::Parquet => self.write_parquet(&mut df, &path)?,
            }
            info!(
                "Wrote {} {} records to {}",
                df.height(),
                T::KIND,
                path.display()
            );
            written.push(path);
        }

        Ok(written)
    }

    /// Printable table with its title
    pub fn preview<T: Specification>(&self, aggregate: &Aggregate<T>) -> Result<String> {
        let df = self.to_dataframe(aggregate)?;
        Ok(format!("{}\n{}", sheet_title(T::KIND), df))
    }

    fn write_xlsx<T: Specification>(&self, aggregate: &Aggregate<T>, path: &Path) -> Result<()> {
        debug!("Writing xlsx to {}", path.display());
        build_workbook(aggregate)
            .and_then(|mut workbook| workbook.save(path))
            .map_err(|e| PvsystError::ExportFailed {
                path: path.to_path_buf(),
                reason: format!("Failed to write xlsx: {}", e),
            })
    }

    fn write_csv(&self, df: &mut DataFrame, path: &Path) -> Result<()> {
        debug!("Writing CSV to {}", path.display());
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| PvsystError::ExportFailed {
                path: path.to_path_buf(),
                reason: format!("Failed to write CSV: {}", e),
            })
    }

    fn write_parquet(&self, df: &mut DataFrame, path: &Path) -> Result<()> {
        debug!(
            "Writing parquet to {} ({:?})",
            path.display(),
            self.config.compression
        );
        let file = File::create(path)?;
        ParquetWriter::new(file)
            .with_compression(self.config.compression.to_polars_compression())
            .finish(df)
            .map_err(|e| PvsystError::ExportFailed {
                path: path.to_path_buf(),
                reason: format!("Failed to write parquet: {}", e),
            })?;
        Ok(())
    }
}

/// Single-sheet workbook: bold header row from the present columns, one row per record
fn build_workbook<T: Specification>(
    aggregate: &Aggregate<T>,
) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_title(T::KIND))?;

    let columns = aggregate.present_columns();
    let header_format = Format::new().set_bold();
    for (col, name) in (0u16..).zip(&columns) {
        worksheet.write_string_with_format(0, col, *name, &header_format)?;
    }

    for (row, record) in (1u32..).zip(aggregate.records()) {
        for (col, name) in (0u16..).zip(&columns) {
            match record.value(name) {
                Some(FieldValue::Text(text)) => {
                    worksheet.write_string(row, col, text)?;
                }
                Some(FieldValue::Float(v)) => {
                    worksheet.write_number(row, col, display_value(name, v))?;
                }
                Some(FieldValue::Integer(v)) => {
                    worksheet.write_number(row, col, v as f64)?;
                }
                None => {}
            }
        }
    }

    worksheet.autofit();
    Ok(workbook)
}
