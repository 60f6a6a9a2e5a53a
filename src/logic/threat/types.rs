//! Threat Types
//!
//! Core value types for the detection pipeline. No logic, only data
//! structures shared by every detector.

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK LEVELS
// ============================================================================

/// Risk level attached to a detected threat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Parse a policy-supplied level; comparison is case-insensitive
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            "CRITICAL" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }
}

impl Default for RiskLevel {
    /// Detectors that have no opinion of their own report MEDIUM
    fn default() -> Self {
        RiskLevel::Medium
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SIGNAL SOURCE
// ============================================================================

/// Which clipboard track produced the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSource {
    Text,
    Image,
}

impl SignalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Text => "text",
            SignalSource::Image => "image",
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// THREAT SIGNAL
// ============================================================================

/// A detector's finding that a piece of content is sensitive.
/// Immutable once created; every detector constructs the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatSignal {
    /// Named kind of the threat ("Aadhaar Number", "AWS Access Key", ...)
    pub kind: String,
    /// Human description shown in alerts and incident records
    pub description: String,
    pub risk_level: RiskLevel,
    pub source: SignalSource,
}

impl ThreatSignal {
    pub fn new(kind: &str, description: &str, risk_level: RiskLevel, source: SignalSource) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.to_string(),
            risk_level,
            source,
        }
    }

    /// Signal field by policy match key, rendered as a string.
    /// Unknown keys resolve to None so a rule naming them can only match
    /// via the wildcard.
    pub fn field(&self, key: &str) -> Option<String> {
        match key {
            "threat_type" => Some(self.kind.clone()),
            "description" => Some(self.description.clone()),
            "risk_level" => Some(self.risk_level.as_str().to_string()),
            "source" => Some(self.source.as_str().to_string()),
            _ => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
