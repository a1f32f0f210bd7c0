use serde::{Deserialize, Serialize};

/// A liquid-holding tank.
///
/// Invariants maintained by the process model: `0 <= level_m3 <= volume_m3`
/// and `0 <= concentration_wt <= 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub name: String,
    pub volume_m3: f64,
    pub level_m3: f64,
    #[serde(rename = "temperature_K")]
    pub temperature_k: f64,
    /// H2SO4 mass fraction in wt-%.
    pub concentration_wt: f64,
}

impl Vessel {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        volume_m3: f64,
        level_m3: f64,
        temperature_k: f64,
        concentration_wt: f64,
    ) -> Self {
        Self {
            name: name.into(),
            volume_m3,
            level_m3,
            temperature_k,
            concentration_wt,
        }
    }

    /// Free volume above the liquid surface.
    #[must_use]
    pub fn spare_m3(&self) -> f64 {
        (self.volume_m3 - self.level_m3).max(0.0)
    }

    #[must_use]
    pub fn has_liquid(&self) -> bool {
        self.level_m3 > 0.0
    }

    #[must_use]
    pub fn has_headspace(&self) -> bool {
        self.level_m3 < self.volume_m3
    }

    #[must_use]
    pub fn temperature_c(&self) -> f64 {
        self.temperature_k - 273.15
    }
}
