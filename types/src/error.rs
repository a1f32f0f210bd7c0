use thiserror::Error;

/// Rejection of a control request. The request has no side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown device: {0}")]
    UnknownDevice(String),
    #[error("invalid request: {0}")]
    Validation(String),
}
