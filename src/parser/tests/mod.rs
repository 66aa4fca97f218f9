//! Test utilities for PVsyst record parsing
//!
//! Builders for raw export lines with chosen tokens at chosen positions.

// Test modules
mod batch_tests;
mod field_parser_tests;

/// Build a raw line of `len` tokens, empty except for the given positions
pub fn line_with(len: usize, fields: &[(usize, &str)]) -> String {
    let mut tokens: Vec<&str> = vec![""; len];
    for (position, value) in fields {
        tokens[*position] = *value;
    }
    tokens.join(";")
}

/// Complete inverter line as exported by PVsyst
pub fn sample_inverter_line(model: &str, frequency: &str) -> String {
    line_with(
        40,
        &[
            (0, "1"),
            (1, "SMA"),
            (2, model),
            (3, "SMA_STP25000TL.OND"),
            (4, "Manufacturer 2020"),
            (7, "25.0"),
            (8, "25.0"),
            (9, "36.2"),
            (10, "36.2"),
            (11, "400"),
            (12, " Tri "),
            (13, frequency),
            (17, "40"),
            (18, "600"),
            (19, "390"),
            (20, "1000"),
            (24, "66"),
            (29, "6"),
            (30, "2"),
            (39, "1.5"),
        ],
    )
}

/// Complete PV module line as exported by PVsyst
pub fn sample_panel_line(model: &str, power: &str, length: &str, width: &str) -> String {
    line_with(
        44,
        &[
            (0, "2"),
            (1, "Jinko Solar"),
            (2, model),
            (3, "Jinko_JKM350M.PAN"),
            (4, "Manufacturer 2023"),
            (7, power),
            (11, "mtSiMono"),
            (12, "72"),
            (13, "1"),
            (15, "45"),
            (16, "40.9"),
            (17, "8.56"),
            (18, "49.5"),
            (19, "9.1"),
            (20, "0.048"),
            (22, "-0.37"),
            (35, "1500"),
            (40, length),
            (41, width),
            (43, "22.5"),
        ],
    )
}

/// Float comparison with a tolerance
pub fn assert_approx_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}
