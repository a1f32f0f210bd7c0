//! Value types for the acid neutralization simulator.
//!
//! This crate contains plain value types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application: the process model
//! produces them, the control surface passes them around, the HTTP layer serializes them.

mod device;
mod error;
mod snapshot;
mod speed;
mod vessel;

pub use device::{DeviceId, DeviceStates};
pub use error::ControlError;
pub use snapshot::{OffGasDiagnostics, ProcessSnapshot};
pub use speed::SpeedFactor;
pub use vessel::Vessel;
