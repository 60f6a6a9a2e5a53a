//! Threat Module
//!
//! Detection stage of the pipeline: turns raw clipboard content into a
//! `ThreatSignal`, or nothing.
//!
//! ## Structure
//! - `types`: Core types (ThreatSignal, RiskLevel, SignalSource)
//! - `patterns`: Fixed ordered regex table + scanner
//! - `semantic`: Semantic leak detector capability interface
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{patterns, ThreatSignal};
//!
//! if let Some(signal) = patterns::scan(&clipboard_text) {
//!     // hand to the policy engine
//! }
//! ```

// Allow unused - some exports for future use
#![allow(unused)]

pub mod patterns;
pub mod semantic;
pub mod types;

// Re-export main types for convenience
pub use semantic::{LeakVerdict, NullSemanticDetector, SemanticLeakDetector};
pub use types::{RiskLevel, SignalSource, ThreatSignal};
