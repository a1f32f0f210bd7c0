use serde::{Deserialize, Serialize};

use crate::{DeviceStates, Vessel};

/// Off-gas figures computed at the end of each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OffGasDiagnostics {
    /// Vented CO2 at standard conditions (1 bar, 273.15 K).
    pub co2_flow_m3_h: f64,
    pub co2_flow_kg_h: f64,
    pub off_gas_temp_c: f64,
    /// Headspace relative humidity while the PSV vents, otherwise 0.
    pub humidity_pct: f64,
}

/// Immutable read view of the whole process state.
///
/// Field names on the wire are the ones the front-end polls for; do not
/// rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    #[serde(rename = "time")]
    pub time_s: f64,
    /// Always T-01, M-01, R-01 in that order.
    pub tanks: Vec<Vessel>,
    /// Remaining CaCO3 in the reactor, kg.
    pub ca_mass: f64,
    pub pressure_bar_abs: f64,
    pub pressure_bar_g: f64,
    pub running: bool,
    pub speed_factor: f64,
    pub co2_flow_m3_h: f64,
    pub co2_flow_kg_h: f64,
    #[serde(rename = "off_gas_temp_C")]
    pub off_gas_temp_c: f64,
    pub humidity_pct: f64,
    #[serde(rename = "heat_kJ_cum")]
    pub heat_kj_cum: f64,
    pub devices: DeviceStates,
}

impl ProcessSnapshot {
    /// Looks a tank up by its plant tag.
    #[must_use]
    pub fn tank(&self, name: &str) -> Option<&Vessel> {
        self.tanks.iter().find(|v| v.name == name)
    }

    /// Serialize into the JSON document served to the front-end.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        // Every field is a plain number, bool or string, which always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
