//! Test utilities for consolidated table export

use crate::aggregate::Aggregate;
use crate::models::{InverterSpecification, PanelSpecification};
use crate::parser::RecordParser;


/// Panel aggregate with two fully specified modules, in this order
pub fn create_test_panels() -> Aggregate<PanelSpecification> {
    let parser = RecordParser::default();
    [
        panel_line("JKM350M-72", "350", "1700", "1000"),
        panel_line("LR4-72HPH-450M", "450", "2094", "1038"),
    ]
    .iter()
    .map(|line| parser.parse_panel(line).unwrap())
    .collect()
}

/// Inverter aggregate with one dual-frequency device
pub fn create_test_inverters() -> Aggregate<InverterSpecification> {
    let parser = RecordParser::default();
    let line = "0;SMA;STP 25000TL-30;SMA_STP25000TL.OND;Manufacturer 2020;;;25;25;36.2;36.2;400;Tri;50/60Hz";
    std::iter::once(parser.parse_inverter(line).unwrap()).collect()
}

fn panel_line(model: &str, power: &str, length: &str, width: &str) -> String {
    let mut tokens = vec![""; 44];
    tokens[1] = "Jinko Solar";
    tokens[2] = model;
    tokens[7] = power;
    tokens[11] = "mtSiMono";
    tokens[12] = "72";
    tokens[13] = "1";
    tokens[40] = length;
    tokens[41] = width;
    tokens.join(";")
}
