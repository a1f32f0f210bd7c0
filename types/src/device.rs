//! Manually operated plant devices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ControlError;

/// The four operator-controlled devices of the plant.
///
/// The set is closed: every wire identifier maps to exactly one variant and
/// anything else is rejected with [`ControlError::UnknownDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceId {
    /// P-01, acid transfer pump from T-01 into M-01.
    PumpA,
    /// P-02, feed pump from M-01 into the reactor.
    PumpB,
    /// V-01, process water valve on M-01.
    Valve,
    /// A-01, reactor agitator. Display only.
    Agitator,
}

impl DeviceId {
    pub const ALL: [DeviceId; 4] = [
        DeviceId::PumpA,
        DeviceId::PumpB,
        DeviceId::Valve,
        DeviceId::Agitator,
    ];

    /// Identifier used on the wire and as the key in snapshot `devices`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DeviceId::PumpA => "pump_a",
            DeviceId::PumpB => "pump_b",
            DeviceId::Valve => "valve",
            DeviceId::Agitator => "agitator",
        }
    }

    /// Plant equipment tag shown on the P&ID.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            DeviceId::PumpA => "P-01",
            DeviceId::PumpB => "P-02",
            DeviceId::Valve => "V-01",
            DeviceId::Agitator => "A-01",
        }
    }

    /// Parse a device identifier.
    ///
    /// Matching is exact after normalization: surrounding whitespace is
    /// trimmed, ASCII case is folded and `-` is read as `_`, so `pump-A`
    /// names [`DeviceId::PumpA`].
    pub fn parse(raw: &str) -> Result<Self, ControlError> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "pump_a" => Ok(DeviceId::PumpA),
            "pump_b" => Ok(DeviceId::PumpB),
            "valve" => Ok(DeviceId::Valve),
            "agitator" => Ok(DeviceId::Agitator),
            _ => Err(ControlError::UnknownDevice(raw.to_string())),
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceId {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// On/off state of every device. Serializes as an object keyed by wire id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStates {
    pub pump_a: bool,
    pub pump_b: bool,
    pub valve: bool,
    pub agitator: bool,
}

impl DeviceStates {
    #[must_use]
    pub fn get(&self, id: DeviceId) -> bool {
        match id {
            DeviceId::PumpA => self.pump_a,
            DeviceId::PumpB => self.pump_b,
            DeviceId::Valve => self.valve,
            DeviceId::Agitator => self.agitator,
        }
    }

    pub fn set(&mut self, id: DeviceId, on: bool) {
        let slot = match id {
            DeviceId::PumpA => &mut self.pump_a,
            DeviceId::PumpB => &mut self.pump_b,
            DeviceId::Valve => &mut self.valve,
            DeviceId::Agitator => &mut self.agitator,
        };
        *slot = on;
    }

    /// Every combination of device flags, in binary counting order.
    pub fn all_combinations() -> impl Iterator<Item = DeviceStates> {
        (0u8..16).map(|bits| DeviceStates {
            pump_a: bits & 0b0001 != 0,
            pump_b: bits & 0b0010 != 0,
            valve: bits & 0b0100 != 0,
            agitator: bits & 0b1000 != 0,
        })
    }
}
