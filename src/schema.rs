//! Positional field tables for PVsyst component export lines.
//!
//! Each device kind owns one [`FieldSchema`]: a static, versioned list of
//! [`FieldSpec`] entries mapping a named attribute to its zero-based token
//! index, semantic type and default. An upstream export-format change only
//! touches these tables, never the extraction code in [`crate::parser`].

use crate::constants::SCHEMA_VERSION;
use crate::error::{PvsystError, Result};
use crate::models::{DeviceKind, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Attribute names as they appear in the consolidated table header
pub mod columns {
    pub const MANUFACTURER: &str = "Manufacturer";
    pub const MODEL: &str = "Model";
    pub const FILE_NAME: &str = "File_Name";
    pub const DATA_SOURCE: &str = "Data_Source";

    // Inverter
    pub const NOMINAL_AC_POWER_KW: &str = "Nominal_AC_Power_kW";
    pub const MAXIMUM_AC_POWER_KW: &str = "Maximum_AC_Power_kW";
    pub const NOMINAL_AC_CURRENT_A: &str = "Nominal_AC_current_A";
    pub const MAXIMUM_AC_CURRENT_A: &str = "Maximum_AC_current_A";
    pub const NOMINAL_AC_VOLTAGE_V: &str = "Nominal_AC_Voltage_V";
    pub const PHASE: &str = "Phase";
    pub const FREQUENCY_HZ: &str = "Frequency_Hz";
    pub const POWER_THRESHOLD_W: &str = "Power_threshold_W";
    pub const NOMINAL_MPP_VOLTAGE_V: &str = "Nominal_MPP_Voltage_V";
    pub const MIN_MPP_VOLTAGE_V: &str = "Min_MPP_Voltage_V";
    pub const MAX_DC_VOLTAGE_V: &str = "Max_DC_Voltage_V";
    pub const MAX_DC_CURRENT_A: &str = "Max_DC_Current_A";
    pub const TOTAL_STRING_INPUTS: &str = "Total_String_Inputs";
    pub const TOTAL_MPPT: &str = "Total_MPPT";
    pub const NIGHT_CONSUMPTION_W: &str = "Night_Consumption_W";

    // Panel
    pub const NOMINAL_POWER_W: &str = "Nominal_Power_W";
    pub const TECHNOLOGY: &str = "Technology";
    pub const CELLS_IN_SERIES: &str = "Cells_in_Series";
    pub const CELLS_IN_PARALLEL: &str = "Cells_in_Parallel";
    pub const MAXIMUM_VOLTAGE_IEC: &str = "Maximum_Voltage_IEC";
    pub const NOCT_C: &str = "NOCT_C";
    pub const VMP_V: &str = "Vmp_V";
    pub const IMP_A: &str = "Imp_A";
    pub const VOC_V: &str = "Voc_V";
    pub const ISC_A: &str = "Isc_A";
    pub const CURRENT_TEMP_COEFF: &str = "Current_Temp_Coeff";
    pub const POWER_TEMP_COEFF: &str = "Power_Temp_Coeff";
    pub const MODULE_LENGTH: &str = "Module_Length";
    pub const MODULE_WIDTH: &str = "Module_Width";
    pub const MODULE_WEIGHT: &str = "Module_Weight";
    pub const PANEL_AREA_M2: &str = "Panel_Area_m2";
    pub const EFFICIENCY_PERCENT: &str = "Efficiency_percent";
}

use columns::*;

/// How a raw token is coerced into a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    String,
    Float,
    Integer,
    /// Float with `50/60` and `Hz` unit handling
    Frequency,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Float => "float",
            SemanticType::Integer => "integer",
            SemanticType::Frequency => "frequency",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitespace handling applied to a token before coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimPolicy {
    /// Strip leading and trailing whitespace
    Trim,
    /// Use the token as exported
    Keep,
}

/// Value a field resolves to when its token is absent or empty
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Float(f64),
    Integer(u64),
}

impl FieldDefault {
    pub fn to_value(self) -> FieldValue {
        match self {
            FieldDefault::Text(s) => FieldValue::Text(s.to_string()),
            FieldDefault::Float(v) => FieldValue::Float(v),
            FieldDefault::Integer(v) => FieldValue::Integer(v),
        }
    }
}

/// Declaration of one positional attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub position: usize,
    pub semantic_type: SemanticType,
    pub default: FieldDefault,
    pub trim: TrimPolicy,
}

impl FieldSpec {
    pub const fn string(name: &'static str, position: usize) -> Self {
        Self {
            name,
            position,
            semantic_type: SemanticType::String,
            default: FieldDefault::Text(""),
            trim: TrimPolicy::Trim,
        }
    }

    pub const fn float(name: &'static str, position: usize) -> Self {
        Self {
            name,
            position,
            semantic_type: SemanticType::Float,
            default: FieldDefault::Float(0.0),
            trim: TrimPolicy::Trim,
        }
    }

    pub const fn integer(name: &'static str, position: usize) -> Self {
        Self {
            name,
            position,
            semantic_type: SemanticType::Integer,
            default: FieldDefault::Integer(0),
            trim: TrimPolicy::Trim,
        }
    }

    pub const fn frequency(name: &'static str, position: usize) -> Self {
        Self {
            name,
            position,
            semantic_type: SemanticType::Frequency,
            default: FieldDefault::Float(0.0),
            trim: TrimPolicy::Trim,
        }
    }
}

/// Versioned positional table for one device kind
#[derive(Debug)]
pub struct FieldSchema {
    pub version: u32,
    pub kind: DeviceKind,
    pub fields: &'static [FieldSpec],
    /// Display order of the consolidated table, derived columns included
    pub column_order: &'static [&'static str],
}

impl FieldSchema {
    /// Look up a field declaration by attribute name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Highest token index any field reads
    pub fn max_position(&self) -> usize {
        self.fields.iter().map(|f| f.position).max().unwrap_or(0)
    }

    /// Check the table for duplicate names or positions and for extracted
    /// fields missing from the display order
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut positions = HashSet::new();

        for field in self.fields {
            if !names.insert(field.name) {
                return Err(PvsystError::configuration(format!(
                    "{} schema declares {} twice",
                    self.kind, field.name
                )));
            }
            if !positions.insert(field.position) {
                return Err(PvsystError::configuration(format!(
                    "{} schema maps more than one field to position {}",
                    self.kind, field.position
                )));
            }
            if !self.column_order.contains(&field.name) {
                return Err(PvsystError::configuration(format!(
                    "{} schema field {} is not in the column order",
                    self.kind, field.name
                )));
            }
        }

        Ok(())
    }
}

/// Inverter export line: `Frequency_Hz` is read raw from position 13 and normalized
pub static INVERTER_SCHEMA: FieldSchema = FieldSchema {
    version: SCHEMA_VERSION,
    kind: DeviceKind::Inverter,
    fields: &[
        FieldSpec::string(MANUFACTURER, 1),
        FieldSpec::string(MODEL, 2),
        FieldSpec::string(FILE_NAME, 3),
        FieldSpec::string(DATA_SOURCE, 4),
        FieldSpec::float(NOMINAL_AC_POWER_KW, 7),
        FieldSpec::float(MAXIMUM_AC_POWER_KW, 8),
        FieldSpec::float(NOMINAL_AC_CURRENT_A, 9),
        FieldSpec::float(MAXIMUM_AC_CURRENT_A, 10),
        FieldSpec::float(NOMINAL_AC_VOLTAGE_V, 11),
        FieldSpec::string(PHASE, 12),
        FieldSpec::frequency(FREQUENCY_HZ, 13),
        FieldSpec::float(POWER_THRESHOLD_W, 17),
        FieldSpec::float(NOMINAL_MPP_VOLTAGE_V, 18),
        FieldSpec::float(MIN_MPP_VOLTAGE_V, 19),
        FieldSpec::float(MAX_DC_VOLTAGE_V, 20),
        FieldSpec::float(MAX_DC_CURRENT_A, 24),
        FieldSpec::float(TOTAL_STRING_INPUTS, 29),
        FieldSpec::float(TOTAL_MPPT, 30),
        FieldSpec::float(NIGHT_CONSUMPTION_W, 39),
    ],
    column_order: &[
        MANUFACTURER,
        MODEL,
        FILE_NAME,
        DATA_SOURCE,
        NOMINAL_AC_POWER_KW,
        MAXIMUM_AC_POWER_KW,
        NOMINAL_AC_CURRENT_A,
        MAXIMUM_AC_CURRENT_A,
        NOMINAL_AC_VOLTAGE_V,
        PHASE,
        FREQUENCY_HZ,
        POWER_THRESHOLD_W,
        NOMINAL_MPP_VOLTAGE_V,
        MIN_MPP_VOLTAGE_V,
        MAX_DC_VOLTAGE_V,
        MAX_DC_CURRENT_A,
        TOTAL_MPPT,
        TOTAL_STRING_INPUTS,
        NIGHT_CONSUMPTION_W,
    ],
};

/// PV module export line; area and efficiency are derived after extraction
pub static PANEL_SCHEMA: FieldSchema = FieldSchema {
    version: SCHEMA_VERSION,
    kind: DeviceKind::Panel,
    fields: &[
        FieldSpec::string(MANUFACTURER, 1),
        FieldSpec::string(MODEL, 2),
        FieldSpec::string(FILE_NAME, 3),
        FieldSpec::string(DATA_SOURCE, 4),
        FieldSpec::float(NOMINAL_POWER_W, 7),
        FieldSpec::string(TECHNOLOGY, 11),
        FieldSpec::integer(CELLS_IN_SERIES, 12),
        FieldSpec::integer(CELLS_IN_PARALLEL, 13),
        FieldSpec::float(NOCT_C, 15),
        FieldSpec::float(VMP_V, 16),
        FieldSpec::float(IMP_A, 17),
        FieldSpec::float(VOC_V, 18),
        FieldSpec::float(ISC_A, 19),
        FieldSpec::float(CURRENT_TEMP_COEFF, 20),
        FieldSpec::float(POWER_TEMP_COEFF, 22),
        FieldSpec::float(MAXIMUM_VOLTAGE_IEC, 35),
        FieldSpec::float(MODULE_LENGTH, 40),
        FieldSpec::float(MODULE_WIDTH, 41),
        FieldSpec::float(MODULE_WEIGHT, 43),
    ],
    column_order: &[
        MANUFACTURER,
        MODEL,
        FILE_NAME,
        DATA_SOURCE,
        NOMINAL_POWER_W,
        TECHNOLOGY,
        CELLS_IN_SERIES,
        CELLS_IN_PARALLEL,
        MAXIMUM_VOLTAGE_IEC,
        NOCT_C,
        VMP_V,
        IMP_A,
        VOC_V,
        ISC_A,
        CURRENT_TEMP_COEFF,
        POWER_TEMP_COEFF,
        MODULE_LENGTH,
        MODULE_WIDTH,
        MODULE_WEIGHT,
        PANEL_AREA_M2,
        EFFICIENCY_PERCENT,
    ],
};

/// Table for a device kind
pub fn schema_for(kind: DeviceKind) -> &'static FieldSchema {
    match kind {
        DeviceKind::Inverter => &INVERTER_SCHEMA,
        DeviceKind::Panel => &PANEL_SCHEMA,
    }
}

/// Fixed display precision for derived columns
pub fn display_precision(column: &str) -> Option<u32> {
    match column {
        PANEL_AREA_M2 => Some(crate::constants::AREA_DECIMALS),
        EFFICIENCY_PERCENT => Some(crate::constants::EFFICIENCY_DECIMALS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_consistent() {
        INVERTER_SCHEMA.validate().unwrap();
        PANEL_SCHEMA.validate().unwrap();
    }

    #[test]
    fn test_known_positions() {
        assert_eq!(INVERTER_SCHEMA.field(FREQUENCY_HZ).unwrap().position, 13);
        assert_eq!(INVERTER_SCHEMA.field(NIGHT_CONSUMPTION_W).unwrap().position, 39);
        assert_eq!(PANEL_SCHEMA.field(MAXIMUM_VOLTAGE_IEC).unwrap().position, 35);
        assert_eq!(PANEL_SCHEMA.field(MODULE_WEIGHT).unwrap().position, 43);
        assert!(PANEL_SCHEMA.field(PANEL_AREA_M2).is_none());
    }

    #[test]
    fn test_max_position() {
        assert_eq!(INVERTER_SCHEMA.max_position(), 39);
        assert_eq!(PANEL_SCHEMA.max_position(), 43);
    }

    #[test]
    fn test_column_order_lengths() {
        assert_eq!(INVERTER_SCHEMA.column_order.len(), 19);
        assert_eq!(PANEL_SCHEMA.column_order.len(), 21);
        // Display order swaps the two inverter count columns
        let order = INVERTER_SCHEMA.column_order;
        let mppt = order.iter().position(|c| *c == TOTAL_MPPT).unwrap();
        let strings = order.iter().position(|c| *c == TOTAL_STRING_INPUTS).unwrap();
        assert!(mppt < strings);
    }

    #[test]
    fn test_validate_rejects_duplicate_position() {
        static BROKEN: FieldSchema = FieldSchema {
            version: 0,
            kind: DeviceKind::Panel,
            fields: &[FieldSpec::string(MODEL, 2), FieldSpec::string(MANUFACTURER, 2)],
            column_order: &[MANUFACTURER, MODEL],
        };
        assert!(BROKEN.validate().is_err());
    }

    #[test]
    fn test_display_precision() {
        assert_eq!(display_precision(PANEL_AREA_M2), Some(3));
        assert_eq!(display_precision(EFFICIENCY_PERCENT), Some(2));
        assert_eq!(display_precision(MODULE_LENGTH), None);
    }
}
