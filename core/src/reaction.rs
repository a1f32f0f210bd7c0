//! CaCO3 + H2SO4 -> CaSO4 + CO2 + H2O in the reactor.

use acidsim_types::Vessel;

use crate::constants::{
    CP_WATER, LIQUID_DENSITY, M_CACO3, M_H2SO4, REACTION_ENTHALPY_KJ_PER_KMOL, SEED_MAX_FEED_WT,
    SEED_THRESHOLD_WT,
};

/// What one parcel of feed did in the reactor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Neutralization {
    /// Equal to the CO2 generated (1:1 stoichiometry).
    pub reacted_kmol: f64,
    pub heat_kj: f64,
}

/// On first acid contact the reactor takes the feed concentration.
pub(crate) fn seed_on_first_contact(reactor: &mut Vessel, feed_m3: f64, feed_wt: f64) {
    if feed_m3 > 0.0 && reactor.concentration_wt < SEED_THRESHOLD_WT && feed_wt < SEED_MAX_FEED_WT
    {
        reactor.concentration_wt = feed_wt;
    }
}

/// React the acid delivered in `feed_m3` at `feed_wt` against the carbonate
/// inventory, heating the reactor contents.
///
/// The smaller of the two reactants is consumed completely. `carbonate_kg`
/// never goes below zero.
pub(crate) fn neutralize(
    reactor: &mut Vessel,
    carbonate_kg: &mut f64,
    feed_m3: f64,
    feed_wt: f64,
) -> Neutralization {
    if feed_m3 <= 0.0 || *carbonate_kg <= 0.0 {
        return Neutralization::default();
    }

    let acid_kmol = feed_m3 * LIQUID_DENSITY * feed_wt / 100.0 / M_H2SO4;
    let carbonate_kmol = *carbonate_kg / M_CACO3;
    if acid_kmol <= 0.0 || !acid_kmol.is_finite() {
        return Neutralization::default();
    }

    let reacted_kmol = if carbonate_kmol <= acid_kmol {
        *carbonate_kg = 0.0;
        carbonate_kmol
    } else {
        *carbonate_kg = (*carbonate_kg - acid_kmol * M_CACO3).max(0.0);
        acid_kmol
    };

    let heat_kj = reacted_kmol * REACTION_ENTHALPY_KJ_PER_KMOL;
    let liquid_kg = reactor.level_m3 * LIQUID_DENSITY;
    if liquid_kg > 0.0 {
        reactor.temperature_k += heat_kj * 1000.0 / (liquid_kg * CP_WATER);
    }

    Neutralization {
        reacted_kmol,
        heat_kj,
    }
}
