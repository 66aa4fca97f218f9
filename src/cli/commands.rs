//! Command implementations for the PVsyst component parser CLI
//!
//! Reads raw export lines, runs the batch parser per device kind, writes the
//! consolidated tables and reports what was parsed or skipped.

use crate::cli::args::{Args, Commands, ExportArgs, SchemaArgs};
use crate::config::AppConfig;
use crate::error::PvsystError;
use crate::export::{TableExporter, sheet_title};
use crate::models::{InverterSpecification, PanelSpecification, Specification};
use crate::parser::{BatchParser, BatchResult};
use crate::schema::schema_for;

use anyhow::{Context, Result};
use colored::*;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the selected subcommand
pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Export(export_args)) => run_export(export_args).await,
        Some(Commands::Schema(schema_args)) => run_schema(&schema_args),
        None => Ok(()),
    }
}

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pvsyst_parser={}", log_level)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    // Commands run in-process (tests) keep the first subscriber
    if installed.is_err() {
        return Ok(());
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Layered configuration: file, then command-line overrides, then validation
pub fn load_configuration(args: &ExportArgs) -> Result<AppConfig> {
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Read raw lines from a file, or stdin for `-`
pub fn read_raw_lines(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        if !path.exists() {
            return Err(PvsystError::InputNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    Ok(content.lines().map(str::to_string).collect())
}

async fn run_export(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();
    setup_logging(args.get_log_level())?;
    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Effective configuration: {:?}", config);

    let batch_parser =
        BatchParser::new(config.parser.clone()).with_progress(args.concurrent && !args.quiet);
    let exporter = TableExporter::new(config.export.clone());

    let mut exported = 0usize;
    if let Some(path) = &args.inverters {
        exported += process_kind::<InverterSpecification>(path, &args, &batch_parser, &exporter)
            .await?;
    }
    if let Some(path) = &args.panels {
        exported +=
            process_kind::<PanelSpecification>(path, &args, &batch_parser, &exporter).await?;
    }

    if exported == 0 {
        anyhow::bail!("No valid records were parsed, nothing exported");
    }

    info!(
        "Export finished in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Parse, report and export one device kind; returns the number of records exported
async fn process_kind<T: Specification>(
    path: &Path,
    args: &ExportArgs,
    batch_parser: &BatchParser,
    exporter: &TableExporter,
) -> Result<usize> {
    let lines = read_raw_lines(path)?;
    info!("Read {} {} lines from {}", lines.len(), T::KIND, path.display());

    let result: BatchResult<T> = if args.concurrent {
        batch_parser.parse_batch_concurrent(lines).await
    } else {
        batch_parser.parse_batch(lines)
    };

    report_batch(&result);

    if result.aggregate.is_empty() {
        warn!("No valid {} records to export", T::KIND);
        return Ok(0);
    }

    let written = exporter
        .export(&result.aggregate)
        .with_context(|| format!("Failed to export {} records", T::KIND))?;
    for path in &written {
        println!("  {} {}", "→".bright_green(), path.display());
    }

    if exporter.config().preview {
        println!();
        println!("{}", exporter.preview(&result.aggregate)?);
    }

    Ok(result.record_count())
}

fn report_batch<T: Specification>(result: &BatchResult<T>) {
    let stats = &result.stats;
    println!(
        "{} {} parsed, {} skipped",
        format!("{}:", sheet_title(T::KIND)).bright_cyan().bold(),
        stats.records_parsed.to_string().bright_green(),
        if stats.records_skipped > 0 {
            stats.records_skipped.to_string().bright_red()
        } else {
            stats.records_skipped.to_string().normal()
        }
    );

    for failure in &result.failures {
        println!(
            "  {} record {}: {}",
            "✗".bright_red(),
            failure.index + 1,
            failure.reason.yellow()
        );
    }
}

fn run_schema(args: &SchemaArgs) -> Result<()> {
    for kind in args.kinds() {
        let schema = schema_for(kind);
        println!(
            "{} {}",
            sheet_title(kind).bright_cyan().bold(),
            format!("(schema v{})", schema.version).bright_black()
        );
        println!("  {:>5}  {:<24} {}", "index", "column", "type");

        for column in schema.column_order {
            match schema.field(column) {
                Some(field) => println!(
                    "  {:>5}  {:<24} {}",
                    field.position, field.name, field.semantic_type
                ),
                None => println!(
                    "  {:>5}  {:<24} {}",
                    "-",
                    column,
                    "derived".bright_black()
                ),
            }
        }
        println!();
    }
    Ok(())
}
