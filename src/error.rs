//! Capability error type
//!
//! Every external collaborator (clipboard, AI services, semantic index)
//! reports failure through this enum. The fail-open / fail-closed policy is
//! applied once at each call site, not inside the capability.

/// Error from an external capability call
#[derive(Debug, Clone)]
pub enum CapabilityError {
    /// Capability is not configured or disabled
    Unavailable { reason: String },
    /// Transport-level failure (HTTP, socket)
    Network(String),
    /// Response was received but could not be understood
    Malformed(String),
    /// The monitored resource could not be read or written
    Resource(String),
}

impl std::fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityError::Unavailable { reason } => write!(f, "Capability unavailable: {}", reason),
            CapabilityError::Network(msg) => write!(f, "Network error: {}", msg),
            CapabilityError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
            CapabilityError::Resource(msg) => write!(f, "Resource error: {}", msg),
        }
    }
}

impl std::error::Error for CapabilityError {}
