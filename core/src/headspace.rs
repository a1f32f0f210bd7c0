//! Reactor headspace: pressure build-up, PSV relief and off-gas diagnostics.

use acidsim_types::{OffGasDiagnostics, Vessel};

use crate::constants::{
    ATMOSPHERE_BAR, M_CO2, PA_PER_BAR, R_GAS, RELIEF_GAIN, RELIEF_SET_POINT_BAR_G,
    STANDARD_TEMPERATURE_K,
};
use crate::thermo::{ideal_gas_kmol, ideal_gas_pressure_bar, water_vapor_pressure_bar};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Pressure added to the headspace this tick, in bar.
///
/// CO2 partial pressure over the free volume plus saturated water vapor.
/// The caller adds this to the running absolute pressure: the headspace
/// accumulates tick over tick and only the PSV takes pressure away.
pub(crate) fn pressure_rise_bar(reactor: &Vessel, co2_kmol: f64) -> f64 {
    if !reactor.has_headspace() {
        return 0.0;
    }
    let free_m3 = reactor.spare_m3();
    let t = reactor.temperature_k;
    let co2_bar = ideal_gas_pressure_bar(co2_kmol, t, free_m3).unwrap_or(0.0);
    co2_bar + water_vapor_pressure_bar(t)
}

#[must_use]
pub(crate) fn gauge_bar(pressure_bar_abs: f64) -> f64 {
    (pressure_bar_abs - ATMOSPHERE_BAR).max(0.0)
}

/// A PSV lift during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Relief {
    pub relief_bar: f64,
    pub vented_kmol: f64,
}

/// Bleed `(gauge - set point) * gain` bar when the set point is exceeded.
pub(crate) fn relieve(pressure_bar_abs: &mut f64, reactor: &Vessel) -> Option<Relief> {
    let gauge = gauge_bar(*pressure_bar_abs);
    if gauge <= RELIEF_SET_POINT_BAR_G {
        return None;
    }
    let relief_bar = (gauge - RELIEF_SET_POINT_BAR_G) * RELIEF_GAIN;
    *pressure_bar_abs = (*pressure_bar_abs - relief_bar).max(0.0);

    let vented_kmol = if reactor.has_headspace() {
        ideal_gas_kmol(relief_bar, reactor.temperature_k, reactor.spare_m3()).unwrap_or(0.0)
    } else {
        0.0
    };

    tracing::trace!(relief_bar, vented_kmol, "PSV venting");
    Some(Relief {
        relief_bar,
        vented_kmol,
    })
}

/// Off-gas figures for the tick that just ran.
pub(crate) fn diagnose(
    reactor: &Vessel,
    relief: Option<Relief>,
    pressure_bar_abs: f64,
    dt: f64,
) -> OffGasDiagnostics {
    let mut diagnostics = OffGasDiagnostics {
        off_gas_temp_c: reactor.temperature_c(),
        ..OffGasDiagnostics::default()
    };
    let Some(relief) = relief else {
        return diagnostics;
    };

    if dt > 0.0 {
        let vented_mol = relief.vented_kmol * 1000.0;
        let standard_m3 = vented_mol * R_GAS * STANDARD_TEMPERATURE_K / PA_PER_BAR;
        diagnostics.co2_flow_m3_h = standard_m3 / dt * SECONDS_PER_HOUR;
        diagnostics.co2_flow_kg_h = relief.vented_kmol * M_CO2 / dt * SECONDS_PER_HOUR;
    }

    let saturation = water_vapor_pressure_bar(reactor.temperature_k);
    if saturation > 0.0 {
        let over_atmosphere = (pressure_bar_abs - ATMOSPHERE_BAR).max(0.0);
        diagnostics.humidity_pct = saturation.min(over_atmosphere) / saturation * 100.0;
    }
    diagnostics
}
