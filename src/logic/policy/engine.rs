//! Policy Engine
//!
//! Resolves a raw `ThreatSignal` into a `PolicyDecision` by walking the
//! active policy's ordered rule list. The rule set is loaded lazily once per
//! engine lifetime and shared read-only across cycles; a reload requires an
//! explicit `invalidate()`.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use super::types::{Enforcement, PolicyDecision, PolicyDocument};
use crate::logic::config::AgentConfig;
use crate::logic::threat::{RiskLevel, ThreatSignal};

// ============================================================================
// ENGINE
// ============================================================================

pub struct PolicyEngine {
    policy_dir: PathBuf,
    policy_name: String,
    cache: OnceCell<PolicyDocument>,
}

impl PolicyEngine {
    pub fn new(policy_dir: impl Into<PathBuf>, policy_name: &str) -> Self {
        Self {
            policy_dir: policy_dir.into(),
            policy_name: policy_name.to_string(),
            cache: OnceCell::new(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.policy_dir.clone(), &config.policy_name)
    }

    /// The active policy document, loading it on first use
    pub fn document(&self) -> &PolicyDocument {
        self.cache
            .get_or_init(|| load_policy(&self.policy_dir, &self.policy_name))
    }

    /// Drop the cached rule set so the next resolve reloads from disk.
    /// Nothing calls this in the default agent; it exists for hosts that
    /// manage policy rollover themselves.
    pub fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    /// Resolve enforcement and effective risk for a signal.
    ///
    /// Total function: always returns a decision. The first matching rule
    /// wins and remaining rules are not evaluated; with no match the
    /// decision defaults to BLOCK at the signal's own risk level.
    pub fn resolve(&self, signal: &ThreatSignal) -> PolicyDecision {
        let mut risk_level = signal.risk_level;
        let mut enforcement = Enforcement::Block;

        for rule in &self.document().rules {
            if !rule.matches(signal) {
                continue;
            }

            if let Some(level) = rule.risk_level.as_deref() {
                match RiskLevel::from_str(level) {
                    Some(level) => risk_level = level,
                    None => log::warn!("Policy rule carries unknown risk level '{}', ignored", level),
                }
            }
            if let Some(mode) = rule.enforcement.as_deref() {
                enforcement = Enforcement::from_str(mode).unwrap_or_else(|| {
                    log::warn!("Policy rule carries unknown enforcement '{}', treating as BLOCK", mode);
                    Enforcement::Block
                });
            }
            break;
        }

        PolicyDecision {
            signal: signal.clone(),
            risk_level,
            enforcement,
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn load_policy(dir: &Path, name: &str) -> PolicyDocument {
    let path = dir.join(format!("{}.json", name));

    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<PolicyDocument>(&content) {
            Ok(doc) => {
                log::info!("Loaded policy '{}' ({} rules) from {:?}", doc.name, doc.rules.len(), path);
                doc
            }
            Err(e) => {
                log::warn!("Policy file {:?} is malformed ({}), using built-in default", path, e);
                fallback_policy()
            }
        },
        Err(e) => {
            log::warn!("Policy file {:?} not readable ({}), using built-in default", path, e);
            fallback_policy()
        }
    }
}

/// Built-in empty-rule policy: every signal resolves to BLOCK at its own
/// risk level.
fn fallback_policy() -> PolicyDocument {
    PolicyDocument {
        name: "Blip Default Policy".to_string(),
        description: "Built-in policy that blocks every detected threat.".to_string(),
        rules: vec![],
    }
}

// ============================================================================
// TESTS
// ============================================================================
