//! Error types for the Glossa capability core.

use crate::host::CapabilityKind;
use thiserror::Error;

/// Result type alias for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Errors returned by the capability facades.
///
/// Every failure in the stack is folded into one of these kinds and handed
/// back as data; nothing propagates past a facade as an unhandled fault.
/// Each variant carries a distinct, stable, human-readable message for the
/// caller to display as-is.
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// The host reports the capability cannot be used at all.
    #[error("the {0} capability is not available on this host")]
    Unavailable(CapabilityKind),

    /// The probe said usable, but the host faulted while constructing the session.
    #[error("session creation failed: {0}")]
    SessionCreation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A ready session faulted at invocation time.
    #[error("capability invocation failed: {0}")]
    Invocation(String),

    /// Both the on-device detector and the fallback service failed.
    #[error("language detection failed: {0}")]
    Detection(String),
}

impl CapabilityError {
    /// Stable machine-readable tag, used by the gateway's error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityError::Unavailable(_) => "capability_unavailable",
            CapabilityError::SessionCreation(_) => "session_creation_failed",
            CapabilityError::InvalidInput(_) => "invalid_input",
            CapabilityError::InvalidParams(_) => "invalid_params",
            CapabilityError::Invocation(_) => "capability_invocation_failed",
            CapabilityError::Detection(_) => "detection_failed",
        }
    }
}
