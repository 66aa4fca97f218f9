//! Derived and normalized attribute calculations
//!
//! Frequency normalization for inverters and the area/efficiency metrics for
//! PV modules. All functions are pure and only see values from the record
//! being built.

use crate::constants::{
    AREA_DECIMALS, DUAL_FREQUENCY_MARKER, EFFICIENCY_DECIMALS, MM_PER_METRE, PRIMARY_FREQUENCY_HZ,
    REFERENCE_IRRADIANCE_W_PER_M2,
};

/// Round to a fixed number of decimal places, exact ties to even
///
/// `0.5625` rounds to `0.562` at three places, matching how the consolidated
/// tables have always been rounded.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Normalize a raw frequency token, `None` when it is not a frequency
///
/// Any text containing `50/60` (any case) is a dual-rated device and maps to
/// the primary 50 Hz. Otherwise a trailing `Hz` is dropped and the rest must
/// parse as a float.
pub fn try_normalize_frequency(raw: &str) -> Option<f64> {
    let lowered = raw.trim().to_lowercase();
    if lowered.contains(DUAL_FREQUENCY_MARKER) {
        return Some(PRIMARY_FREQUENCY_HZ);
    }

    let number = lowered.strip_suffix("hz").unwrap_or(&lowered).trim();
    number.parse::<f64>().ok()
}

/// Lenient frequency normalization: absent or unparseable text gives 0
pub fn normalize_frequency(raw: Option<&str>) -> f64 {
    raw.and_then(try_normalize_frequency).unwrap_or(0.0)
}

/// Module area in m² from millimetre dimensions, rounded to 3 decimals
pub fn panel_area_m2(length_mm: f64, width_mm: f64) -> f64 {
    let length_m = length_mm / MM_PER_METRE;
    let width_m = width_mm / MM_PER_METRE;
    round_to(length_m * width_m, AREA_DECIMALS)
}

/// Module efficiency in percent at reference irradiance, rounded to 2 decimals
///
/// Zero whenever the area is not positive.
pub fn efficiency_percent(nominal_power_w: f64, area_m2: f64) -> f64 {
    if area_m2 > 0.0 {
        let efficiency = nominal_power_w / (area_m2 * REFERENCE_IRRADIANCE_W_PER_M2) * 100.0;
        round_to(efficiency, EFFICIENCY_DECIMALS)
    } else {
        0.0
    }
}
