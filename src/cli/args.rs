//! Command-line argument definitions for the PVsyst component parser
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{AppConfig, CoercionPolicy, CompressionAlgorithm, ExportFormat};
use crate::error::{PvsystError, Result};
use crate::models::DeviceKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the PVsyst component parser
///
/// Extracts inverter and PV module specifications from PVsyst component
/// export lines and consolidates them into one table per device kind.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pvsyst-parser",
    version,
    about = "Consolidate PVsyst inverter and PV module export lines into specification tables"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse raw export lines and write consolidated tables
    Export(ExportArgs),
    /// Show the positional field mapping used for each device kind
    Schema(SchemaArgs),
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Csv,
    Parquet,
    /// CSV and Parquet
    Both,
    /// Xlsx, CSV and Parquet
    All,
}

impl FormatArg {
    pub fn formats(&self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Xlsx => vec![ExportFormat::Xlsx],
            FormatArg::Csv => vec![ExportFormat::Csv],
            FormatArg::Parquet => vec![ExportFormat::Parquet],
            FormatArg::Both => vec![ExportFormat::Csv, ExportFormat::Parquet],
            FormatArg::All => vec![ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Parquet],
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// File with one raw inverter line per line (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    pub inverters: Option<PathBuf>,

    /// File with one raw PV module line per line (`-` for stdin)
    #[arg(long, value_name = "FILE")]
    pub panels: Option<PathBuf>,

    /// Output directory for consolidated tables
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (default xlsx)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long)]
    pub compression: Option<String>,

    /// Reject records whose cell counts are not plain digits
    #[arg(long)]
    pub strict_integers: bool,

    /// Reject inverter records with an unreadable frequency
    #[arg(long)]
    pub strict_frequency: bool,

    /// Default malformed float fields to 0 instead of rejecting the record
    #[arg(long)]
    pub lenient_floats: bool,

    /// Parse records concurrently
    #[arg(long)]
    pub concurrent: bool,

    /// Maximum records parsed at once with --concurrent
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Do not print the consolidated tables
    #[arg(long)]
    pub no_preview: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl ExportArgs {
    /// Check that there is something to parse
    pub fn validate(&self) -> Result<()> {
        if self.inverters.is_none() && self.panels.is_none() {
            return Err(PvsystError::configuration(
                "Provide --inverters and/or --panels",
            ));
        }
        if self.inverters.as_deref() == Some(std::path::Path::new("-"))
            && self.panels.as_deref() == Some(std::path::Path::new("-"))
        {
            return Err(PvsystError::configuration(
                "Only one of --inverters and --panels can read stdin",
            ));
        }
        if self.jobs == Some(0) {
            return Err(PvsystError::configuration("--jobs must be at least 1"));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(output_dir) = &self.output_dir {
            config.export.output_dir = output_dir.clone();
        }
        if let Some(format) = self.format {
            config.export.formats = format.formats();
        }
        if let Some(name) = &self.compression {
            config.export.compression = CompressionAlgorithm::from_name(name)?;
        }
        if self.no_preview {
            config.export.preview = false;
        }
        if self.strict_integers {
            config.parser.integer_policy = CoercionPolicy::Strict;
        }
        if self.strict_frequency {
            config.parser.frequency_policy = CoercionPolicy::Strict;
        }
        if self.lenient_floats {
            config.parser.float_policy = CoercionPolicy::Lenient;
        }
        if let Some(jobs) = self.jobs {
            config.parser.max_concurrent_records = jobs;
        }
        Ok(())
    }

    /// Get log level based on verbosity and quiet flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the schema command
#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    /// Only show one device kind (inverter or panel)
    #[arg(long, value_name = "KIND")]
    pub kind: Option<DeviceKind>,
}

impl SchemaArgs {
    pub fn kinds(&self) -> Vec<DeviceKind> {
        match self.kind {
            Some(kind) => vec![kind],
            None => vec![DeviceKind::Inverter, DeviceKind::Panel],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_export(argv: &[&str]) -> ExportArgs {
        let mut full = vec!["pvsyst-parser", "export"];
        full.extend_from_slice(argv);
        match Args::parse_from(full).command {
            Some(Commands::Export(args)) => args,
            other => panic!("expected export command, got {:?}", other),
        }
    }

    #[test]
    fn test_export_requires_an_input() {
        let args = parse_export(&[]);
        assert!(args.validate().is_err());

        let args = parse_export(&["--panels", "panels.txt"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = parse_export(&[
            "--inverters",
            "inv.txt",
            "-o",
            "out",
            "--format",
            "both",
            "--compression",
            "zstd",
            "--strict-integers",
            "--lenient-floats",
            "-j",
            "3",
            "--no-preview",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(
            config.export.formats,
            vec![ExportFormat::Csv, ExportFormat::Parquet]
        );
        assert_eq!(config.export.compression, CompressionAlgorithm::Zstd);
        assert!(!config.export.preview);
        assert_eq!(config.parser.integer_policy, CoercionPolicy::Strict);
        assert_eq!(config.parser.float_policy, CoercionPolicy::Lenient);
        assert_eq!(config.parser.frequency_policy, CoercionPolicy::Lenient);
        assert_eq!(config.parser.max_concurrent_records, 3);
    }

    #[test]
    fn test_xlsx_format() {
        let args = parse_export(&["--panels", "panels.txt", "--format", "xlsx"]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.export.formats, vec![ExportFormat::Xlsx]);

        let args = parse_export(&["--panels", "panels.txt", "--format", "all"]);
        args.apply_overrides(&mut config).unwrap();
        assert_eq!(config.export.formats.len(), 3);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse_export(&[]).get_log_level(), "warn");
        assert_eq!(parse_export(&["-vv"]).get_log_level(), "debug");
        assert_eq!(parse_export(&["-q"]).get_log_level(), "error");
    }

    #[test]
    fn test_schema_kind() {
        let args = Args::parse_from(["pvsyst-parser", "schema", "--kind", "panel"]);
        match args.command {
            Some(Commands::Schema(schema)) => assert_eq!(schema.kinds(), vec![DeviceKind::Panel]),
            other => panic!("expected schema command, got {:?}", other),
        }
    }
}
