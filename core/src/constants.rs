//! Physical constants and plant parameters.

/// Universal gas constant, J/(mol K).
pub const R_GAS: f64 = 8.314;

/// kg/kmol
pub const M_H2SO4: f64 = 98.079;
/// kg/kmol
pub const M_CACO3: f64 = 100.09;
/// kg/kmol
pub const M_CO2: f64 = 44.01;

/// Lumped density for every liquid in the plant, kg/m3.
pub const LIQUID_DENSITY: f64 = 1000.0;
/// Heat capacity of the reactor contents, J/(kg K).
pub const CP_WATER: f64 = 4186.0;
/// |dH| of CaCO3 + H2SO4 -> CaSO4 + CO2 + H2O, kJ/kmol.
pub const REACTION_ENTHALPY_KJ_PER_KMOL: f64 = 92_800.0;

pub const ATMOSPHERE_BAR: f64 = 1.0;
pub const PA_PER_BAR: f64 = 1e5;
pub const KELVIN_OFFSET: f64 = 273.15;
/// Reference temperature for reporting vented volumes.
pub const STANDARD_TEMPERATURE_K: f64 = 273.15;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// P-01, T-01 -> M-01.
pub const ACID_PUMP_RATE_M3_S: f64 = 0.5 / SECONDS_PER_HOUR;
/// V-01 into M-01.
pub const WATER_RATE_M3_S: f64 = 4.0 / SECONDS_PER_HOUR;
/// P-02, M-01 -> R-01.
pub const FEED_PUMP_RATE_M3_S: f64 = 1.0 / SECONDS_PER_HOUR;

/// PSV set point, bar gauge.
pub const RELIEF_SET_POINT_BAR_G: f64 = 3.0;
/// Fraction of the overpressure bled per tick.
pub const RELIEF_GAIN: f64 = 0.1;

/// Reactor concentration below which the first acid arrival seeds it.
pub const SEED_THRESHOLD_WT: f64 = 1e-3;
/// Mixing tank concentration must be below this to seed the reactor.
pub const SEED_MAX_FEED_WT: f64 = 60.0;

/// Initial plant inventory.
pub mod initial {
    pub const SOURCE_VOLUME_M3: f64 = 5.0;
    pub const SOURCE_LEVEL_M3: f64 = 5.0;
    pub const SOURCE_CONCENTRATION_WT: f64 = 98.0;

    pub const MIXER_VOLUME_M3: f64 = 10.0;
    pub const MIXER_LEVEL_M3: f64 = 0.0;

    pub const REACTOR_VOLUME_M3: f64 = 10.0;
    pub const REACTOR_LEVEL_M3: f64 = 5.0;

    pub const TEMPERATURE_K: f64 = 298.0;
    pub const PRESSURE_BAR_ABS: f64 = 1.0;

    /// 5 m3 of slurry at 1000 kg/m3 and 10 wt-% CaCO3.
    pub const CARBONATE_KG: f64 = REACTOR_LEVEL_M3 * super::LIQUID_DENSITY * 0.10;
}
