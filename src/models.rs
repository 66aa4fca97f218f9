//! Core data structures for parsed component records.
//!
//! Defines the device kinds, the dynamically typed [`FieldValue`] produced by
//! positional extraction, and the two typed specification records that the
//! parser builds from it.

use crate::error::{PvsystError, Result};
use crate::parser::derivation::{efficiency_percent, panel_area_m2};
use crate::schema::{FieldSchema, INVERTER_SCHEMA, PANEL_SCHEMA, columns::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Component kinds exported by the PVsyst database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Inverter,
    Panel,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Inverter => "inverter",
            DeviceKind::Panel => "panel",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = PvsystError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inverter" | "inverters" => Ok(DeviceKind::Inverter),
            "panel" | "panels" | "module" | "modules" => Ok(DeviceKind::Panel),
            other => Err(PvsystError::configuration(format!(
                "Unknown device kind '{}' (expected inverter or panel)",
                other
            ))),
        }
    }
}

/// A single extracted or derived attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Float(f64),
    Integer(u64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Attribute values pulled from one raw record, keyed by schema field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    values: HashMap<&'static str, FieldValue>,
}

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text value of a field; a missing or differently typed entry is an error
    pub fn text(&self, name: &'static str) -> Result<String> {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => Ok(s.clone()),
            _ => Err(PvsystError::MissingField { field: name }),
        }
    }

    pub fn float(&self, name: &'static str) -> Result<f64> {
        match self.values.get(name) {
            Some(FieldValue::Float(v)) => Ok(*v),
            _ => Err(PvsystError::MissingField { field: name }),
        }
    }

    pub fn integer(&self, name: &'static str) -> Result<u64> {
        match self.values.get(name) {
            Some(FieldValue::Integer(v)) => Ok(*v),
            _ => Err(PvsystError::MissingField { field: name }),
        }
    }
}

/// A typed record that can be built from a positional schema
pub trait Specification: Sized + Send + fmt::Debug + 'static {
    /// Device kind this record describes
    const KIND: DeviceKind;

    /// Positional table the parser extracts with
    fn schema() -> &'static FieldSchema;

    /// Build the full record, derived attributes included, from extracted fields
    fn from_fields(fields: &ExtractedFields) -> Result<Self>;

    /// Value of a display column, `None` if this record does not carry it
    fn value(&self, column: &str) -> Option<FieldValue>;

    /// Declared display column order
    fn column_order() -> &'static [&'static str] {
        Self::schema().column_order
    }
}

/// Inverter datasheet values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSpecification {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "File_Name")]
    pub file_name: String,
    #[serde(rename = "Data_Source")]
    pub data_source: String,
    #[serde(rename = "Nominal_AC_Power_kW")]
    pub nominal_ac_power_kw: f64,
    #[serde(rename = "Maximum_AC_Power_kW")]
    pub maximum_ac_power_kw: f64,
    #[serde(rename = "Nominal_AC_current_A")]
    pub nominal_ac_current_a: f64,
    #[serde(rename = "Maximum_AC_current_A")]
    pub maximum_ac_current_a: f64,
    #[serde(rename = "Nominal_AC_Voltage_V")]
    pub nominal_ac_voltage_v: f64,
    #[serde(rename = "Phase")]
    pub phase: String,
    #[serde(rename = "Frequency_Hz")]
    pub frequency_hz: f64,
    #[serde(rename = "Power_threshold_W")]
    pub power_threshold_w: f64,
    #[serde(rename = "Nominal_MPP_Voltage_V")]
    pub nominal_mpp_voltage_v: f64,
    #[serde(rename = "Min_MPP_Voltage_V")]
    pub min_mpp_voltage_v: f64,
    #[serde(rename = "Max_DC_Voltage_V")]
    pub max_dc_voltage_v: f64,
    #[serde(rename = "Max_DC_Current_A")]
    pub max_dc_current_a: f64,
    /// Count, kept as float like every other numeric inverter field
    #[serde(rename = "Total_String_Inputs")]
    pub total_string_inputs: f64,
    #[serde(rename = "Total_MPPT")]
    pub total_mppt: f64,
    #[serde(rename = "Night_Consumption_W")]
    pub night_consumption_w: f64,
}

impl Specification for InverterSpecification {
    const KIND: DeviceKind = DeviceKind::Inverter;

    fn schema() -> &'static FieldSchema {
        &INVERTER_SCHEMA
    }

    fn from_fields(fields: &ExtractedFields) -> Result<Self> {
        Ok(Self {
            manufacturer: fields.text(MANUFACTURER)?,
            model: fields.text(MODEL)?,
            file_name: fields.text(FILE_NAME)?,
            data_source: fields.text(DATA_SOURCE)?,
            nominal_ac_power_kw: fields.float(NOMINAL_AC_POWER_KW)?,
            maximum_ac_power_kw: fields.float(MAXIMUM_AC_POWER_KW)?,
            nominal_ac_current_a: fields.float(NOMINAL_AC_CURRENT_A)?,
            maximum_ac_current_a: fields.float(MAXIMUM_AC_CURRENT_A)?,
            nominal_ac_voltage_v: fields.float(NOMINAL_AC_VOLTAGE_V)?,
            phase: fields.text(PHASE)?,
            frequency_hz: fields.float(FREQUENCY_HZ)?,
            power_threshold_w: fields.float(POWER_THRESHOLD_W)?,
            nominal_mpp_voltage_v: fields.float(NOMINAL_MPP_VOLTAGE_V)?,
            min_mpp_voltage_v: fields.float(MIN_MPP_VOLTAGE_V)?,
            max_dc_voltage_v: fields.float(MAX_DC_VOLTAGE_V)?,
            max_dc_current_a: fields.float(MAX_DC_CURRENT_A)?,
            total_string_inputs: fields.float(TOTAL_STRING_INPUTS)?,
            total_mppt: fields.float(TOTAL_MPPT)?,
            night_consumption_w: fields.float(NIGHT_CONSUMPTION_W)?,
        })
    }

    fn value(&self, column: &str) -> Option<FieldValue> {
        let value = match column {
            MANUFACTURER => FieldValue::Text(self.manufacturer.clone()),
            MODEL => FieldValue::Text(self.model.clone()),
            FILE_NAME => FieldValue::Text(self.file_name.clone()),
            DATA_SOURCE => FieldValue::Text(self.data_source.clone()),
            NOMINAL_AC_POWER_KW => FieldValue::Float(self.nominal_ac_power_kw),
            MAXIMUM_AC_POWER_KW => FieldValue::Float(self.maximum_ac_power_kw),
            NOMINAL_AC_CURRENT_A => FieldValue::Float(self.nominal_ac_current_a),
            MAXIMUM_AC_CURRENT_A => FieldValue::Float(self.maximum_ac_current_a),
            NOMINAL_AC_VOLTAGE_V => FieldValue::Float(self.nominal_ac_voltage_v),
            PHASE => FieldValue::Text(self.phase.clone()),
            FREQUENCY_HZ => FieldValue::Float(self.frequency_hz),
            POWER_THRESHOLD_W => FieldValue::Float(self.power_threshold_w),
            NOMINAL_MPP_VOLTAGE_V => FieldValue::Float(self.nominal_mpp_voltage_v),
            MIN_MPP_VOLTAGE_V => FieldValue::Float(self.min_mpp_voltage_v),
            MAX_DC_VOLTAGE_V => FieldValue::Float(self.max_dc_voltage_v),
            MAX_DC_CURRENT_A => FieldValue::Float(self.max_dc_current_a),
            TOTAL_STRING_INPUTS => FieldValue::Float(self.total_string_inputs),
            TOTAL_MPPT => FieldValue::Float(self.total_mppt),
            NIGHT_CONSUMPTION_W => FieldValue::Float(self.night_consumption_w),
            _ => return None,
        };
        Some(value)
    }
}

/// PV module datasheet values with derived area and efficiency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpecification {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "File_Name")]
    pub file_name: String,
    #[serde(rename = "Data_Source")]
    pub data_source: String,
    #[serde(rename = "Nominal_Power_W")]
    pub nominal_power_w: f64,
    #[serde(rename = "Technology")]
    pub technology: String,
    #[serde(rename = "Cells_in_Series")]
    pub cells_in_series: u64,
    #[serde(rename = "Cells_in_Parallel")]
    pub cells_in_parallel: u64,
    #[serde(rename = "Maximum_Voltage_IEC")]
    pub maximum_voltage_iec: f64,
    #[serde(rename = "NOCT_C")]
    pub noct_c: f64,
    #[serde(rename = "Vmp_V")]
    pub vmp_v: f64,
    #[serde(rename = "Imp_A")]
    pub imp_a: f64,
    #[serde(rename = "Voc_V")]
    pub voc_v: f64,
    #[serde(rename = "Isc_A")]
    pub isc_a: f64,
    #[serde(rename = "Current_Temp_Coeff")]
    pub current_temp_coeff: f64,
    #[serde(rename = "Power_Temp_Coeff")]
    pub power_temp_coeff: f64,
    /// Millimetres
    #[serde(rename = "Module_Length")]
    pub module_length: f64,
    /// Millimetres
    #[serde(rename = "Module_Width")]
    pub module_width: f64,
    #[serde(rename = "Module_Weight")]
    pub module_weight: f64,
    #[serde(rename = "Panel_Area_m2")]
    pub panel_area_m2: f64,
    #[serde(rename = "Efficiency_percent")]
    pub efficiency_percent: f64,
}

impl Specification for PanelSpecification {
    const KIND: DeviceKind = DeviceKind::Panel;

    fn schema() -> &'static FieldSchema {
        &PANEL_SCHEMA
    }

    fn from_fields(fields: &ExtractedFields) -> Result<Self> {
        let nominal_power_w = fields.float(NOMINAL_POWER_W)?;
        let module_length = fields.float(MODULE_LENGTH)?;
        let module_width = fields.float(MODULE_WIDTH)?;

        let panel_area_m2 = panel_area_m2(module_length, module_width);
        let efficiency_percent = efficiency_percent(nominal_power_w, panel_area_m2);

        Ok(Self {
            manufacturer: fields.text(MANUFACTURER)?,
            model: fields.text(MODEL)?,
            file_name: fields.text(FILE_NAME)?,
            data_source: fields.text(DATA_SOURCE)?,
            nominal_power_w,
            technology: fields.text(TECHNOLOGY)?,
            cells_in_series: fields.integer(CELLS_IN_SERIES)?,
            cells_in_parallel: fields.integer(CELLS_IN_PARALLEL)?,
            maximum_voltage_iec: fields.float(MAXIMUM_VOLTAGE_IEC)?,
            noct_c: fields.float(NOCT_C)?,
            vmp_v: fields.float(VMP_V)?,
            imp_a: fields.float(IMP_A)?,
            voc_v: fields.float(VOC_V)?,
            isc_a: fields.float(ISC_A)?,
            current_temp_coeff: fields.float(CURRENT_TEMP_COEFF)?,
            power_temp_coeff: fields.float(POWER_TEMP_COEFF)?,
            module_length,
            module_width,
            module_weight: fields.float(MODULE_WEIGHT)?,
            panel_area_m2,
            efficiency_percent,
        })
    }

    fn value(&self, column: &str) -> Option<FieldValue> {
        let value = match column {
            MANUFACTURER => FieldValue::Text(self.manufacturer.clone()),
            MODEL => FieldValue::Text(self.model.clone()),
            FILE_NAME => FieldValue::Text(self.file_name.clone()),
            DATA_SOURCE => FieldValue::Text(self.data_source.clone()),
            NOMINAL_POWER_W => FieldValue::Float(self.nominal_power_w),
            TECHNOLOGY => FieldValue::Text(self.technology.clone()),
            CELLS_IN_SERIES => FieldValue::Integer(self.cells_in_series),
            CELLS_IN_PARALLEL => FieldValue::Integer(self.cells_in_parallel),
            MAXIMUM_VOLTAGE_IEC => FieldValue::Float(self.maximum_voltage_iec),
            NOCT_C => FieldValue::Float(self.noct_c),
            VMP_V => FieldValue::Float(self.vmp_v),
            IMP_A => FieldValue::Float(self.imp_a),
            VOC_V => FieldValue::Float(self.voc_v),
            ISC_A => FieldValue::Float(self.isc_a),
            CURRENT_TEMP_COEFF => FieldValue::Float(self.current_temp_coeff),
            POWER_TEMP_COEFF => FieldValue::Float(self.power_temp_coeff),
            MODULE_LENGTH => FieldValue::Float(self.module_length),
            MODULE_WIDTH => FieldValue::Float(self.module_width),
            MODULE_WEIGHT => FieldValue::Float(self.module_weight),
            PANEL_AREA_M2 => FieldValue::Float(self.panel_area_m2),
            EFFICIENCY_PERCENT => FieldValue::Float(self.efficiency_percent),
            _ => return None,
        };
        Some(value)
    }
}

/// Outcome of parsing a line whose kind is only known at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Inverter(InverterSpecification),
    Panel(PanelSpecification),
}

impl ParsedRecord {
    pub fn kind(&self) -> DeviceKind {
        match self {
            ParsedRecord::Inverter(_) => DeviceKind::Inverter,
            ParsedRecord::Panel(_) => DeviceKind::Panel,
        }
    }

    pub fn value(&self, column: &str) -> Option<FieldValue> {
        match self {
            ParsedRecord::Inverter(spec) => spec.value(column),
            ParsedRecord::Panel(spec) => spec.value(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_from_str() {
        assert_eq!("Inverter".parse::<DeviceKind>().unwrap(), DeviceKind::Inverter);
        assert_eq!(" panels ".parse::<DeviceKind>().unwrap(), DeviceKind::Panel);
        assert!("battery".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn test_extracted_fields_type_mismatch() {
        let mut fields = ExtractedFields::new();
        fields.insert(MODEL, FieldValue::Float(1.0));

        assert!(matches!(
            fields.text(MODEL),
            Err(PvsystError::MissingField { field: "Model" })
        ));
        assert!(fields.float(MODEL).is_ok());
        assert!(fields.integer(MANUFACTURER).is_err());
    }

    #[test]
    fn test_every_display_column_has_a_value() {
        let inverter = InverterSpecification::from_fields(&defaults_for(&INVERTER_SCHEMA)).unwrap();
        for column in InverterSpecification::column_order() {
            assert!(inverter.value(column).is_some(), "missing {}", column);
        }

        let panel = PanelSpecification::from_fields(&defaults_for(&PANEL_SCHEMA)).unwrap();
        for column in PanelSpecification::column_order() {
            assert!(panel.value(column).is_some(), "missing {}", column);
        }
        assert_eq!(panel.value("Unknown_Column"), None);
    }

    fn defaults_for(schema: &FieldSchema) -> ExtractedFields {
        let mut fields = ExtractedFields::new();
        for spec in schema.fields {
            fields.insert(spec.name, spec.default.to_value());
        }
        fields
    }
}
