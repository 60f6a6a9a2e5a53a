//! Incident Record Schema
//!
//! One entry per terminal outcome, append-only. This is the on-disk
//! contract consumed by the admin dashboard; field names are part of it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::response::ActionOutcome;

/// Persisted incident entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub event_id: Uuid,
    /// Local wall-clock, "YYYY-MM-DD HH:MM:SS"
    pub timestamp: String,
    pub threat_type: String,
    pub description: String,
    pub action_taken: String,
    pub username: String,
    pub hostname: String,
    pub risk_level: String,
    pub source: String,
    pub policy_enforcement: String,
}

impl IncidentRecord {
    pub fn from_outcome(outcome: &ActionOutcome) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: outcome.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            threat_type: outcome.decision.signal.kind.clone(),
            description: outcome.decision.signal.description.clone(),
            action_taken: outcome.action.as_str().to_string(),
            username: outcome.username.clone(),
            hostname: outcome.hostname.clone(),
            risk_level: outcome.decision.risk_level.as_str().to_string(),
            source: outcome.decision.signal.source.as_str().to_string(),
            policy_enforcement: outcome.decision.enforcement.as_str().to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::{Enforcement, PolicyDecision};
    use crate::logic::response::ActionTaken;
    use crate::logic::threat::{RiskLevel, SignalSource, ThreatSignal};

    #[test]
    fn test_record_flattens_outcome() {
        let decision = PolicyDecision {
            signal: ThreatSignal::new("AWS Access Key", "AWS Identity Access Key", RiskLevel::High, SignalSource::Text),
            risk_level: RiskLevel::Critical,
            enforcement: Enforcement::Warn,
        };
        let outcome = ActionOutcome::new(decision, ActionTaken::Blocked);
        let record = IncidentRecord::from_outcome(&outcome);

        assert_eq!(record.threat_type, "AWS Access Key");
        assert_eq!(record.action_taken, "BLOCKED");
        // Effective (overridden) risk is what gets persisted
        assert_eq!(record.risk_level, "CRITICAL");
        assert_eq!(record.source, "text");
        assert_eq!(record.policy_enforcement, "WARN");
        assert_eq!(record.timestamp.len(), 19);
    }
}
