//! Application constants for the PVsyst component parser
//!
//! This module contains the export-format markers, unit factors, rounding
//! precisions and output naming used throughout the parser.

// =============================================================================
// Raw Record Format
// =============================================================================

/// Field delimiter of a PVsyst component export line
pub const FIELD_DELIMITER: char = ';';

/// Version of the positional field tables in [`crate::schema`]
///
/// Bump whenever an index in the inverter or panel table changes.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Frequency Normalization
// =============================================================================

/// Marker for devices rated for both 50 Hz and 60 Hz grids (matched case-insensitively)
pub const DUAL_FREQUENCY_MARKER: &str = "50/60";

/// Frequency reported for dual-rated devices
pub const PRIMARY_FREQUENCY_HZ: f64 = 50.0;

// =============================================================================
// Panel Derivations
// =============================================================================

/// Module dimensions are exported in millimetres
pub const MM_PER_METRE: f64 = 1000.0;

/// Standard test condition irradiance used for module efficiency (W/m²)
pub const REFERENCE_IRRADIANCE_W_PER_M2: f64 = 1000.0;

/// Decimal places kept for the derived panel area
pub const AREA_DECIMALS: u32 = 3;

/// Decimal places kept for the derived panel efficiency
pub const EFFICIENCY_DECIMALS: u32 = 2;

// =============================================================================
// Export Naming
// =============================================================================

pub const INVERTER_FILE_STEM: &str = "consolidated_inverter_specifications";
pub const PANEL_FILE_STEM: &str = "consolidated_panel_specifications";

pub const INVERTER_SHEET_TITLE: &str = "Inverter Specifications";
pub const PANEL_SHEET_TITLE: &str = "Panel Specifications";

/// Directory name under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "pvsyst-parser";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default output directory for consolidated files
pub const DEFAULT_OUTPUT_DIR: &str = "output";
