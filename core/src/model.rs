use acidsim_types::{
    ControlError, DeviceId, DeviceStates, OffGasDiagnostics, ProcessSnapshot, SpeedFactor, Vessel,
};

use crate::constants::initial;
use crate::headspace::{self, Relief};
use crate::{reaction, transfer};

/// Per-tick deltas returned by [`ProcessModel::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// The `dt` actually applied after sanitizing.
    pub dt_s: f64,
    pub acid_transferred_m3: f64,
    pub water_added_m3: f64,
    pub reactor_feed_m3: f64,
    /// CaCO3 consumed, equal to the CO2 generated.
    pub reacted_kmol: f64,
    pub heat_kj: f64,
    pub pressure_rise_bar: f64,
    /// Zero when the PSV stayed closed.
    pub relief_bar: f64,
    pub vented_kmol: f64,
}

impl StepOutcome {
    #[must_use]
    pub fn vented(&self) -> bool {
        self.relief_bar > 0.0
    }
}

/// The whole plant state and its transition function.
///
/// There is exactly one live instance per simulation, owned by the control
/// surface. Nothing outside this crate touches the vessels; readers go
/// through [`ProcessModel::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessModel {
    pub(crate) source: Vessel,
    pub(crate) mixer: Vessel,
    pub(crate) reactor: Vessel,
    pub(crate) carbonate_kg: f64,
    pub(crate) pressure_bar_abs: f64,
    pub(crate) time_s: f64,
    pub(crate) heat_kj_cum: f64,
    pub(crate) devices: DeviceStates,
    pub(crate) speed: SpeedFactor,
    pub(crate) running: bool,
    pub(crate) diagnostics: OffGasDiagnostics,
}

impl Default for ProcessModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessModel {
    /// A freshly charged plant: full acid tank, empty mixer, reactor half
    /// full of carbonate slurry, headspace at atmospheric pressure.
    #[must_use]
    pub fn new() -> Self {
        let reactor = Vessel::new(
            "R-01",
            initial::REACTOR_VOLUME_M3,
            initial::REACTOR_LEVEL_M3,
            initial::TEMPERATURE_K,
            0.0,
        );
        let diagnostics = headspace::diagnose(&reactor, None, initial::PRESSURE_BAR_ABS, 0.0);
        Self {
            source: Vessel::new(
                "T-01",
                initial::SOURCE_VOLUME_M3,
                initial::SOURCE_LEVEL_M3,
                initial::TEMPERATURE_K,
                initial::SOURCE_CONCENTRATION_WT,
            ),
            mixer: Vessel::new(
                "M-01",
                initial::MIXER_VOLUME_M3,
                initial::MIXER_LEVEL_M3,
                initial::TEMPERATURE_K,
                0.0,
            ),
            reactor,
            carbonate_kg: initial::CARBONATE_KG,
            pressure_bar_abs: initial::PRESSURE_BAR_ABS,
            time_s: 0.0,
            heat_kj_cum: 0.0,
            devices: DeviceStates::default(),
            speed: SpeedFactor::real_time(),
            running: false,
            diagnostics,
        }
    }

    /// Replace the whole state with the initial charge.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance the plant by `dt` seconds.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn step(&mut self, dt: f64) -> StepOutcome {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "Ignoring invalid timestep");
            0.0
        };
        self.time_s += dt;

        let mut outcome = StepOutcome {
            dt_s: dt,
            ..StepOutcome::default()
        };

        if self.devices.pump_a {
            outcome.acid_transferred_m3 =
                transfer::transfer_acid(&mut self.source, &mut self.mixer, dt);
        }
        if self.devices.valve {
            outcome.water_added_m3 = transfer::add_water(&mut self.mixer, dt);
        }
        if self.devices.pump_b {
            outcome.reactor_feed_m3 = transfer::feed_reactor(&mut self.mixer, &mut self.reactor, dt);
        }

        let feed_wt = self.mixer.concentration_wt;
        reaction::seed_on_first_contact(&mut self.reactor, outcome.reactor_feed_m3, feed_wt);
        let neutralization = reaction::neutralize(
            &mut self.reactor,
            &mut self.carbonate_kg,
            outcome.reactor_feed_m3,
            feed_wt,
        );
        outcome.reacted_kmol = neutralization.reacted_kmol;
        outcome.heat_kj = neutralization.heat_kj;
        self.heat_kj_cum += neutralization.heat_kj;

        let rise = headspace::pressure_rise_bar(&self.reactor, neutralization.reacted_kmol);
        let raised = self.pressure_bar_abs + rise;
        if raised.is_finite() {
            self.pressure_bar_abs = raised.max(0.0);
            outcome.pressure_rise_bar = rise;
        }

        let relief = headspace::relieve(&mut self.pressure_bar_abs, &self.reactor);
        if let Some(Relief {
            relief_bar,
            vented_kmol,
        }) = relief
        {
            outcome.relief_bar = relief_bar;
            outcome.vented_kmol = vented_kmol;
        }
        self.diagnostics =
            headspace::diagnose(&self.reactor, relief, self.pressure_bar_abs, dt);

        outcome
    }

    /// Switch a device by wire identifier. Unknown ids leave state unchanged.
    pub fn set_device(&mut self, id: &str, on: bool) -> Result<DeviceId, ControlError> {
        let device = DeviceId::parse(id)?;
        self.set_device_state(device, on);
        Ok(device)
    }

    pub fn set_device_state(&mut self, device: DeviceId, on: bool) {
        self.devices.set(device, on);
    }

    /// Store the clamped speed factor and return it.
    pub fn set_speed(&mut self, factor: f64) -> SpeedFactor {
        self.speed = SpeedFactor::new(factor);
        self.speed
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn speed(&self) -> SpeedFactor {
        self.speed
    }

    #[must_use]
    pub fn elapsed_s(&self) -> f64 {
        self.time_s
    }

    #[must_use]
    pub fn pressure_bar_abs(&self) -> f64 {
        self.pressure_bar_abs
    }

    #[must_use]
    pub fn pressure_bar_g(&self) -> f64 {
        headspace::gauge_bar(self.pressure_bar_abs)
    }

    #[must_use]
    pub fn carbonate_kg(&self) -> f64 {
        self.carbonate_kg
    }

    /// Tanks in display order: T-01, M-01, R-01.
    #[must_use]
    pub fn vessels(&self) -> [&Vessel; 3] {
        [&self.source, &self.mixer, &self.reactor]
    }

    #[must_use]
    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            time_s: self.time_s,
            tanks: self.vessels().into_iter().cloned().collect(),
            ca_mass: self.carbonate_kg,
            pressure_bar_abs: self.pressure_bar_abs,
            pressure_bar_g: self.pressure_bar_g(),
            running: self.running,
            speed_factor: self.speed.value(),
            co2_flow_m3_h: self.diagnostics.co2_flow_m3_h,
            co2_flow_kg_h: self.diagnostics.co2_flow_kg_h,
            off_gas_temp_c: self.diagnostics.off_gas_temp_c,
            humidity_pct: self.diagnostics.humidity_pct,
            heat_kj_cum: self.heat_kj_cum,
            devices: self.devices,
        }
    }
}
