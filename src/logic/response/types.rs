//! Response Types
//!
//! Terminal states of a decision cycle and the value types flowing between
//! the state machine, the presenter and the watcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::policy::{Enforcement, PolicyDecision};
use crate::logic::threat::RiskLevel;

// ============================================================================
// TERMINAL ACTIONS
// ============================================================================

/// Terminal state of one decision cycle. A cycle always starts PENDING and
/// ends in exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTaken {
    Blocked,
    Allowed,
    Sanitized,
    Logged,
    /// User chose sanitize but no sanitization capability is configured;
    /// the resource was wiped instead
    SanitizeUnavailable,
    /// User chose sanitize on an image; images are never rewritten in
    /// place, so this is a safety block
    BlockedImageSanitize,
}

impl ActionTaken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTaken::Blocked => "BLOCKED",
            ActionTaken::Allowed => "ALLOWED",
            ActionTaken::Sanitized => "SANITIZED",
            ActionTaken::Logged => "LOGGED",
            ActionTaken::SanitizeUnavailable => "SANITIZE_UNAVAILABLE",
            ActionTaken::BlockedImageSanitize => "BLOCKED_IMAGE_SANITIZE",
        }
    }

    /// Did this action wipe the monitored resource?
    pub fn wipes_resource(&self) -> bool {
        matches!(
            self,
            ActionTaken::Blocked | ActionTaken::SanitizeUnavailable | ActionTaken::BlockedImageSanitize
        )
    }
}

impl std::fmt::Display for ActionTaken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// USER CHOICE
// ============================================================================

/// Discriminated result of the user-interaction capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    Allow,
    Block,
    Sanitize,
}

// ============================================================================
// DEDUP DIRECTIVE
// ============================================================================

/// Instruction for the watcher's dedup memory after a terminal transition.
///
/// `Reset` forces re-evaluation if the same content reappears (block-style
/// outcomes). `Replace` carries the sanitized value read back from the
/// resource so the cleaned content is not immediately re-flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupUpdate {
    Keep,
    Reset,
    Replace(String),
}

// ============================================================================
// ALERT CONTEXT
// ============================================================================

/// What the presenter shows when asking for a choice
#[derive(Debug, Clone)]
pub struct AlertContext {
    pub threat_type: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub enforcement: Enforcement,
    /// Optional natural-language explanation; empty when the explain
    /// capability is unavailable
    pub explanation: String,
}

// ============================================================================
// ACTION OUTCOME
// ============================================================================

/// Terminal record of one decision cycle. Created once, immutable, handed
/// to the incident recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub decision: PolicyDecision,
    pub action: ActionTaken,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub hostname: String,
}

impl ActionOutcome {
    pub fn new(decision: PolicyDecision, action: ActionTaken) -> Self {
        Self {
            decision,
            action,
            timestamp: Utc::now(),
            username: current_username(),
            hostname: current_hostname(),
        }
    }
}

/// What one finished cycle hands back to the watcher
#[derive(Debug, Clone)]
pub struct CycleResult {
    pub outcome: ActionOutcome,
    pub dedup: DedupUpdate,
}

fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn current_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "-".to_string())
}

// ============================================================================
// TESTS
// ============================================================================
