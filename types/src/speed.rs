use serde::{Deserialize, Serialize};

/// Real-time pacing multiplier, valid in `[MIN, MAX]` by construction.
///
/// Out-of-range input is clamped rather than rejected; NaN maps to `MIN`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    #[must_use]
    pub fn new(factor: f64) -> Self {
        if factor.is_nan() {
            return Self(Self::MIN);
        }
        Self(factor.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn real_time() -> Self {
        Self(1.0)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SpeedFactor {
    fn default() -> Self {
        Self::real_time()
    }
}

impl From<f64> for SpeedFactor {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<SpeedFactor> for f64 {
    fn from(value: SpeedFactor) -> Self {
        value.0
    }
}
