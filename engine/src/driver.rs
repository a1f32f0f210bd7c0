//! The periodic driver task.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

use acidsim_types::SpeedFactor;

use crate::Shared;

/// Speeds below this pace as if they were this, so speed 0 parks the
/// driver on a long interval instead of dividing by zero.
pub const MIN_PACING_SPEED: f64 = 0.01;

/// Longest wait between two steps. Anything beyond is "never" in practice.
pub(crate) const MAX_PACE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Real-time wait between two steps of `timestep_s` at `speed`.
#[must_use]
pub fn pace(timestep_s: f64, speed: SpeedFactor) -> Duration {
    Duration::try_from_secs_f64(timestep_s / speed.value().max(MIN_PACING_SPEED))
        .unwrap_or(MAX_PACE)
        .min(MAX_PACE)
}

fn next_deadline(stepped_at: Instant, wait: Duration) -> Instant {
    stepped_at
        .checked_add(wait)
        .or_else(|| Instant::now().checked_add(MAX_PACE))
        .unwrap_or(stepped_at)
}

/// Step once under the lock. `None` once this driver is stopped or replaced.
pub(crate) fn tick(shared: &Shared, generation: u64) -> Option<SpeedFactor> {
    let mut model = shared.lock_model();
    if !model.is_running() || shared.generation.load(Ordering::Relaxed) != generation {
        return None;
    }
    let outcome = model.step(shared.timestep_s);
    if outcome.vented() {
        tracing::debug!(
            relief_bar = outcome.relief_bar,
            pressure_bar_g = model.pressure_bar_g(),
            "PSV lifted"
        );
    }
    Some(model.speed())
}

fn running_speed(shared: &Shared, generation: u64) -> Option<SpeedFactor> {
    let model = shared.lock_model();
    let current = shared.generation.load(Ordering::Relaxed) == generation;
    (model.is_running() && current).then(|| model.speed())
}

pub(crate) async fn run(shared: Arc<Shared>, generation: u64) {
    tracing::debug!(generation, "Driver loop entered");
    loop {
        let stepped_at = Instant::now();
        let Some(speed) = tick(&shared, generation) else {
            break;
        };

        let mut deadline = next_deadline(stepped_at, pace(shared.timestep_s, speed));
        loop {
            tokio::select! {
                () = sleep_until(deadline) => break,
                () = shared.wake.notified() => {
                    // Speed changed, or we are being stopped.
                    let Some(speed) = running_speed(&shared, generation) else {
                        tracing::debug!(generation, "Driver loop exited");
                        return;
                    };
                    deadline = next_deadline(stepped_at, pace(shared.timestep_s, speed));
                }
            }
        }
    }
    tracing::debug!(generation, "Driver loop exited");
}
