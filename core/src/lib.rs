//! Process model for the acid neutralization plant.
//!
//! The model owns three vessels (acid source T-01, mixing tank M-01 and
//! reactor R-01), the remaining CaCO3 inventory, the reactor headspace
//! pressure and the off-gas diagnostics. It is pure and deterministic:
//! the next state depends only on the current state, `dt` and the device
//! flags.
//!
//! # Step order
//!
//! ```text
//! acid transfer -> water dilution -> reactor feed -> reaction
//!     -> headspace pressure -> relief valve -> diagnostics
//! ```
//!
//! Later stages consume the deltas of earlier ones within the same tick,
//! so the order is fixed.

pub mod constants;
mod headspace;
mod model;
mod reaction;
pub mod thermo;
mod transfer;

pub use model::{ProcessModel, StepOutcome};
