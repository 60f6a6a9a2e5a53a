//! Policy Types
//!
//! Data structures for policy documents and resolved decisions.
//! No decision logic here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::threat::{RiskLevel, ThreatSignal};

// ============================================================================
// ENFORCEMENT MODES
// ============================================================================

/// Enforcement mode governing whether/how the user is involved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enforcement {
    /// Default: surface the decision and lean toward wiping the resource
    Block,
    /// Surface the decision; user judgment expected
    Warn,
    /// Record silently, resource left untouched, no user interaction
    Log,
    /// Surface the decision; pre-cleared content class
    Allow,
}

impl Enforcement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Enforcement::Block => "BLOCK",
            Enforcement::Warn => "WARN",
            Enforcement::Log => "LOG",
            Enforcement::Allow => "ALLOW",
        }
    }

    /// Parse a policy-supplied mode; comparison is case-insensitive
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BLOCK" => Some(Enforcement::Block),
            "WARN" => Some(Enforcement::Warn),
            "LOG" => Some(Enforcement::Log),
            "ALLOW" => Some(Enforcement::Allow),
            _ => None,
        }
    }
}

impl std::fmt::Display for Enforcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// POLICY DOCUMENT
// ============================================================================

/// One ordered rule inside a policy document.
///
/// A rule matches iff every field named in `match` equals the signal's
/// corresponding field (rendered as a string) or is the wildcard `"*"`.
/// Fields not named are not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRule {
    #[serde(rename = "match", default)]
    pub match_fields: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub enforcement: Option<String>,
}

impl PolicyRule {
    pub fn matches(&self, signal: &ThreatSignal) -> bool {
        self.match_fields.iter().all(|(key, expected)| {
            let expected = match expected {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if expected == "*" {
                return true;
            }
            signal.field(key).unwrap_or_default() == expected
        })
    }
}

/// A named, ordered rule list loaded from the policy source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

// ============================================================================
// POLICY DECISION
// ============================================================================

/// A signal after policy resolution. Both fields are always populated:
/// resolution is a total function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub signal: ThreatSignal,
    /// Effective risk after any rule override
    pub risk_level: RiskLevel,
    pub enforcement: Enforcement,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::threat::SignalSource;

    fn signal() -> ThreatSignal {
        ThreatSignal::new("Aadhaar Number", "Indian National ID (UIDAI)", RiskLevel::High, SignalSource::Text)
    }

    fn rule(fields: &[(&str, &str)]) -> PolicyRule {
        PolicyRule {
            match_fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_field_match() {
        assert!(rule(&[("threat_type", "Aadhaar Number")]).matches(&signal()));
        assert!(!rule(&[("threat_type", "PAN Card")]).matches(&signal()));
    }

    #[test]
    fn test_wildcard_matches_anything() {
        assert!(rule(&[("threat_type", "*")]).matches(&signal()));
        assert!(rule(&[("source", "*")]).matches(&signal()));
    }

    #[test]
    fn test_all_named_fields_must_match() {
        assert!(rule(&[("threat_type", "Aadhaar Number"), ("source", "text")]).matches(&signal()));
        assert!(!rule(&[("threat_type", "Aadhaar Number"), ("source", "image")]).matches(&signal()));
    }

    #[test]
    fn test_empty_match_map_matches_everything() {
        assert!(rule(&[]).matches(&signal()));
    }

    #[test]
    fn test_enforcement_parse() {
        assert_eq!(Enforcement::from_str("log"), Some(Enforcement::Log));
        assert_eq!(Enforcement::from_str("BLOCK"), Some(Enforcement::Block));
        assert_eq!(Enforcement::from_str("nope"), None);
    }
}
