//! Ideal-gas and vapor-pressure correlations.

use crate::constants::{KELVIN_OFFSET, PA_PER_BAR, R_GAS};

/// Antoine coefficients for water, mmHg and degC.
const ANTOINE_A: f64 = 8.07131;
const ANTOINE_B: f64 = 1730.63;
const ANTOINE_C: f64 = 233.426;
/// Range the coefficients are fitted for.
const ANTOINE_MIN_C: f64 = 1.0;
const ANTOINE_MAX_C: f64 = 100.0;

const BAR_PER_MMHG: f64 = 0.001_333_22;

/// Saturated water vapor pressure in bar.
///
/// The temperature is clamped into 1..100 degC before evaluating.
#[must_use]
pub fn water_vapor_pressure_bar(temperature_k: f64) -> f64 {
    let t_c = if temperature_k.is_finite() {
        (temperature_k - KELVIN_OFFSET).clamp(ANTOINE_MIN_C, ANTOINE_MAX_C)
    } else {
        ANTOINE_MIN_C
    };
    let mmhg = 10f64.powf(ANTOINE_A - ANTOINE_B / (ANTOINE_C + t_c));
    mmhg * BAR_PER_MMHG
}

/// Pressure of `kmol` of ideal gas filling `volume_m3`, in bar.
///
/// `None` when the volume is not positive.
#[must_use]
pub fn ideal_gas_pressure_bar(kmol: f64, temperature_k: f64, volume_m3: f64) -> Option<f64> {
    if volume_m3 <= 0.0 {
        return None;
    }
    let pa = kmol * 1000.0 * R_GAS * temperature_k / volume_m3;
    pa.is_finite().then_some(pa / PA_PER_BAR)
}

/// Inverse of [`ideal_gas_pressure_bar`]: kmol held at `pressure_bar`.
///
/// `None` when the temperature is not positive.
#[must_use]
pub fn ideal_gas_kmol(pressure_bar: f64, temperature_k: f64, volume_m3: f64) -> Option<f64> {
    if temperature_k <= 0.0 {
        return None;
    }
    let mol = pressure_bar * PA_PER_BAR * volume_m3 / (R_GAS * temperature_k);
    mol.is_finite().then_some(mol / 1000.0)
}
