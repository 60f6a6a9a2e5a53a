//! Policy Module
//!
//! Decides what happens to a detected threat. THIS is where enforcement is
//! decided - not the detectors, not the presenter.
//!
//! ## Structure
//! - `types`: Core types (Enforcement, PolicyRule, PolicyDocument, PolicyDecision)
//! - `engine`: Rule loading, caching and first-match-wins resolution
//!
//! ## Usage
//! ```ignore
//! use crate::logic::policy::PolicyEngine;
//!
//! let engine = PolicyEngine::from_config(&config);
//! let decision = engine.resolve(&signal);
//! match decision.enforcement {
//!     Enforcement::Log => record_only(),
//!     _ => prompt_user(),
//! }
//! ```

#![allow(dead_code)]

pub mod engine;
pub mod types;

// Re-export main types for convenience
pub use engine::PolicyEngine;
pub use types::{Enforcement, PolicyDecision, PolicyDocument, PolicyRule};
