//! Incident Store
//!
//! JSON-array file, one entry appended per terminal outcome. An empty or
//! corrupted store resets to an empty collection - persistence problems
//! must never take the agent down.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::types::IncidentRecord;
use crate::logic::response::ActionOutcome;

// ============================================================================
// RECORDER
// ============================================================================

pub struct IncidentRecorder {
    path: PathBuf,
    // Serializes the read-modify-write append
    write_lock: Mutex<()>,
}

impl IncidentRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default store location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blip-sentinel")
            .join("logs")
            .join("threats.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist one outcome. Failures are logged and swallowed.
    pub fn record(&self, outcome: &ActionOutcome) {
        let record = IncidentRecord::from_outcome(outcome);
        if let Err(e) = self.append(record) {
            log::error!("Failed to persist incident: {}", e);
        } else {
            log::info!(
                "Logged incident: {} -> {}",
                outcome.action,
                outcome.decision.signal.kind
            );
        }
    }

    fn append(&self, record: IncidentRecord) -> std::io::Result<()> {
        let _guard = self.write_lock.lock();

        let mut records = self.load();
        records.push(record);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(&records)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, serialized)
    }

    /// Read the whole collection. Missing, empty or corrupt files read as
    /// an empty collection.
    pub fn load(&self) -> Vec<IncidentRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Incident store corrupted ({}), starting fresh", e);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Read-side analytics (dashboard contract)
    // ------------------------------------------------------------------

    /// Incident counts keyed by action taken
    pub fn counts_by_action(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for record in self.load() {
            *counts.entry(record.action_taken).or_insert(0) += 1;
        }
        counts
    }

    /// Incident counts keyed by threat type
    pub fn counts_by_type(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for record in self.load() {
            *counts.entry(record.threat_type).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::logic::policy::{Enforcement, PolicyDecision};
    use crate::logic::response::ActionTaken;
    use crate::logic::threat::{RiskLevel, SignalSource, ThreatSignal};

    fn outcome(kind: &str, action: ActionTaken) -> ActionOutcome {
        let decision = PolicyDecision {
            signal: ThreatSignal::new(kind, "test", RiskLevel::High, SignalSource::Text),
            risk_level: RiskLevel::High,
            enforcement: Enforcement::Block,
        };
        ActionOutcome::new(decision, action)
    }

    #[test]
    fn test_append_and_load() {
        let dir = TempDir::new().unwrap();
        let store = IncidentRecorder::new(dir.path().join("threats.json"));

        store.record(&outcome("Aadhaar Number", ActionTaken::Blocked));
        store.record(&outcome("AWS Access Key", ActionTaken::Allowed));

        let records = store.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].threat_type, "Aadhaar Number");
        assert_eq!(records[1].action_taken, "ALLOWED");
    }

    #[test]
    fn test_missing_store_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = IncidentRecorder::new(dir.path().join("nope.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_store_resets_instead_of_failing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("threats.json");
        std::fs::write(&path, "{{{ not json").unwrap();

        let store = IncidentRecorder::new(&path);
        assert!(store.load().is_empty());

        // Appending over the corrupt file starts a fresh collection
        store.record(&outcome("PAN Card", ActionTaken::Logged));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_empty_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("threats.json");
        std::fs::write(&path, "   \n").unwrap();

        let store = IncidentRecorder::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_counts() {
        let dir = TempDir::new().unwrap();
        let store = IncidentRecorder::new(dir.path().join("threats.json"));

        store.record(&outcome("Aadhaar Number", ActionTaken::Blocked));
        store.record(&outcome("Aadhaar Number", ActionTaken::Blocked));
        store.record(&outcome("AWS Access Key", ActionTaken::Sanitized));

        assert_eq!(store.counts_by_action().get("BLOCKED"), Some(&2));
        assert_eq!(store.counts_by_action().get("SANITIZED"), Some(&1));
        assert_eq!(store.counts_by_type().get("Aadhaar Number"), Some(&2));
    }
}
