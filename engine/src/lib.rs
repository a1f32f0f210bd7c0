//! Control surface for the process model.
//!
//! # Architecture
//!
//! [`Simulation`] is a cheaply clonable handle around the single live
//! [`ProcessModel`]. Every access, from the driver task or from request
//! handlers, goes through one mutex, so readers never see a half-applied
//! step.
//!
//! ```text
//! start() -> spawn driver -> loop { lock; step(timestep); unlock; wait pace }
//!                                                            ^
//!            set_speed() / pause() -- wake ------------------+
//! ```
//!
//! The physics timestep is fixed; the speed factor only changes how long
//! the driver waits between steps in real time.

mod driver;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use acidsim_config::SimulationConfig;
use acidsim_core::ProcessModel;
use acidsim_types::{ControlError, DeviceId, ProcessSnapshot, SpeedFactor};

pub use driver::{MIN_PACING_SPEED, pace};

pub(crate) struct Shared {
    model: Mutex<ProcessModel>,
    driver: Mutex<Option<JoinHandle<()>>>,
    /// Bumped on every start and pause, under the model lock. A driver only
    /// steps while the counter still holds the value it was spawned with.
    generation: AtomicU64,
    wake: Notify,
    timestep_s: f64,
}

impl Shared {
    // `step` cannot panic, so a poisoned lock still guards a consistent model.
    fn lock_model(&self) -> MutexGuard<'_, ProcessModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_driver(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owner of the one process model instance and its driver task.
#[derive(Clone)]
pub struct Simulation {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("timestep_s", &self.shared.timestep_s)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        let mut model = ProcessModel::new();
        model.set_speed(config.speed());
        Self {
            shared: Arc::new(Shared {
                model: Mutex::new(model),
                driver: Mutex::new(None),
                generation: AtomicU64::new(0),
                wake: Notify::new(),
                timestep_s: config.timestep_s(),
            }),
        }
    }

    /// Simulated seconds advanced per driver tick.
    #[must_use]
    pub fn timestep_s(&self) -> f64 {
        self.shared.timestep_s
    }

    /// Start the driver. Returns `false` if it was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut driver = self.shared.lock_driver();
        let generation = {
            let mut model = self.shared.lock_model();
            if model.is_running() {
                return false;
            }
            model.set_running(true);
            self.shared.generation.fetch_add(1, Ordering::Relaxed) + 1
        };
        *driver = Some(tokio::spawn(driver::run(
            Arc::clone(&self.shared),
            generation,
        )));
        tracing::info!(timestep_s = self.shared.timestep_s, "Simulation started");
        true
    }

    /// Stop the driver. Returns `false` if it was not running.
    pub fn pause(&self) -> bool {
        let mut driver = self.shared.lock_driver();
        let was_running = {
            let mut model = self.shared.lock_model();
            let running = model.is_running();
            model.set_running(false);
            self.shared.generation.fetch_add(1, Ordering::Relaxed);
            running
        };
        if let Some(handle) = driver.take() {
            handle.abort();
        }
        self.shared.wake.notify_one();
        if was_running {
            tracing::info!("Simulation paused");
        }
        was_running
    }

    /// Replace the model with a fresh one. A running simulation keeps
    /// running from t = 0.
    pub fn reset(&self) {
        {
            let mut model = self.shared.lock_model();
            let running = model.is_running();
            *model = ProcessModel::new();
            model.set_running(running);
        }
        self.shared.wake.notify_one();
        tracing::info!("Simulation reset");
    }

    pub fn set_device(&self, id: &str, on: bool) -> Result<DeviceId, ControlError> {
        let device = self.shared.lock_model().set_device(id, on)?;
        tracing::debug!(device = %device, tag = device.tag(), on, "Device switched");
        Ok(device)
    }

    /// Store the clamped speed factor and re-pace the driver.
    pub fn set_speed(&self, factor: f64) -> SpeedFactor {
        let speed = self.shared.lock_model().set_speed(factor);
        self.shared.wake.notify_one();
        tracing::debug!(requested = factor, applied = speed.value(), "Speed changed");
        speed
    }

    #[must_use]
    pub fn snapshot(&self) -> ProcessSnapshot {
        self.shared.lock_model().snapshot()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.lock_model().is_running()
    }

    /// Real-time wait between ticks at the current speed.
    #[must_use]
    pub fn current_pace(&self) -> Duration {
        pace(self.shared.timestep_s, self.shared.lock_model().speed())
    }

    /// Stop the driver ahead of process exit.
    pub fn shutdown(&self) {
        if self.pause() {
            tracing::info!("Driver stopped for shutdown");
        }
    }
}
