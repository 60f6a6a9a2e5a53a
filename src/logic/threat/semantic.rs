//! Semantic Leak Detection Capability
//!
//! The embedding model and vector index live outside this crate; the core
//! only consumes the verdict. Failures are handled fail-open at the call
//! site in the watcher: a broken index must never block the user.

use crate::error::CapabilityError;

// ============================================================================
// VERDICT
// ============================================================================

/// Result of a semantic similarity check
#[derive(Debug, Clone)]
pub struct LeakVerdict {
    pub is_leak: bool,
    /// Reference snippet / distance info when a match was found
    pub reason: Option<String>,
}

impl LeakVerdict {
    pub fn clean() -> Self {
        Self { is_leak: false, reason: None }
    }

    pub fn leak(reason: &str) -> Self {
        Self { is_leak: true, reason: Some(reason.to_string()) }
    }
}

// ============================================================================
// CAPABILITY INTERFACE
// ============================================================================

/// Checks text against an indexed corpus of restricted content.
///
/// The caller must not invoke this for inputs shorter than
/// `constants::MIN_SEMANTIC_LENGTH` and only when the regex stage found
/// nothing and semantic detection is enabled.
pub trait SemanticLeakDetector {
    fn check_for_leak(&self, text: &str) -> Result<LeakVerdict, CapabilityError>;
}

/// Default detector when no semantic index is wired in: everything is clean.
pub struct NullSemanticDetector;

impl SemanticLeakDetector for NullSemanticDetector {
    fn check_for_leak(&self, _text: &str) -> Result<LeakVerdict, CapabilityError> {
        Ok(LeakVerdict::clean())
    }
}

// ============================================================================
// TESTS
// ============================================================================
