//! Individual record parsing for PVsyst component export lines
//!
//! This module turns one raw line into a fully populated specification
//! record. A record is built completely or not at all.

use tracing::{debug, trace};

use super::field_parsers::{extract_fields, split_record};
use crate::config::ParserConfig;
use crate::error::Result;
use crate::models::{
    DeviceKind, InverterSpecification, PanelSpecification, ParsedRecord, Specification,
};

/// Parser for single raw records
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    config: ParserConfig,
}

impl RecordParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one raw line into a typed specification
    pub fn parse<T: Specification>(&self, raw: &str) -> Result<T> {
        let tokens = split_record(raw);
        let schema = T::schema();

        trace!(
            "Parsing {} record with {} tokens (schema v{}, max position {})",
            T::KIND,
            tokens.len(),
            schema.version,
            schema.max_position()
        );
        if tokens.len() <= schema.max_position() {
            debug!(
                "{} record has {} tokens, fields from position {} default",
                T::KIND,
                tokens.len(),
                tokens.len()
            );
        }

        let fields = extract_fields(&tokens, schema, &self.config)?;
        T::from_fields(&fields)
    }

    pub fn parse_inverter(&self, raw: &str) -> Result<InverterSpecification> {
        self.parse(raw)
    }

    pub fn parse_panel(&self, raw: &str) -> Result<PanelSpecification> {
        self.parse(raw)
    }

    /// Parse a line whose kind is chosen at runtime
    pub fn parse_kind(&self, raw: &str, kind: DeviceKind) -> Result<ParsedRecord> {
        match kind {
            DeviceKind::Inverter => self.parse_inverter(raw).map(ParsedRecord::Inverter),
            DeviceKind::Panel => self.parse_panel(raw).map(ParsedRecord::Panel),
        }
    }
}
