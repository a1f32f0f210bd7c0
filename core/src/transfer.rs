//! Rate-limited liquid movements.
//!
//! Every transfer clamps silently at the available liquid and the free
//! capacity of the receiving vessel. A full or empty tank is a steady
//! state, not a fault. Each function returns the volume actually moved.

use acidsim_types::Vessel;

use crate::constants::{ACID_PUMP_RATE_M3_S, FEED_PUMP_RATE_M3_S, WATER_RATE_M3_S};

pub(crate) fn clamp_wt(concentration: f64) -> f64 {
    if concentration.is_finite() {
        concentration.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Remove up to `dv` from `from`, add it to `to`, return the moved volume.
fn move_liquid(from: &mut Vessel, to: &mut Vessel, requested: f64) -> f64 {
    let dv = requested.min(from.level_m3).min(to.spare_m3());
    if dv <= 0.0 || !dv.is_finite() {
        return 0.0;
    }
    from.level_m3 = (from.level_m3 - dv).max(0.0);
    to.level_m3 = (to.level_m3 + dv).min(to.volume_m3);
    dv
}

/// P-01: acid from T-01 into M-01 with a mass-balance concentration update.
pub(crate) fn transfer_acid(source: &mut Vessel, mixer: &mut Vessel, dt: f64) -> f64 {
    if !source.has_liquid() || !mixer.has_headspace() {
        return 0.0;
    }
    let previous = mixer.level_m3;
    let dv = move_liquid(source, mixer, ACID_PUMP_RATE_M3_S * dt);
    if dv > 0.0 && mixer.level_m3 > 0.0 {
        mixer.concentration_wt = clamp_wt(
            (mixer.concentration_wt * previous + source.concentration_wt * dv) / mixer.level_m3,
        );
    }
    dv
}

/// V-01: process water into M-01, diluting it proportionally.
pub(crate) fn add_water(mixer: &mut Vessel, dt: f64) -> f64 {
    let spare = mixer.spare_m3();
    if spare <= 0.0 {
        return 0.0;
    }
    let dvw = (WATER_RATE_M3_S * dt).min(spare);
    if dvw <= 0.0 || !dvw.is_finite() {
        return 0.0;
    }
    let before = mixer.level_m3;
    mixer.level_m3 = (before + dvw).min(mixer.volume_m3);
    if mixer.level_m3 > 0.0 {
        mixer.concentration_wt = clamp_wt(mixer.concentration_wt * before / mixer.level_m3);
    }
    dvw
}

/// P-02: M-01 into the reactor. Any concentration qualifies.
pub(crate) fn feed_reactor(mixer: &mut Vessel, reactor: &mut Vessel, dt: f64) -> f64 {
    if !reactor.has_headspace() {
        return 0.0;
    }
    move_liquid(mixer, reactor, FEED_PUMP_RATE_M3_S * dt)
}
