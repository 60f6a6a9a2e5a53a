//! Agent Configuration
//!
//! Environment-driven settings, snapshotted once at startup and passed by
//! reference to the watcher and pipeline. No runtime reload.

use std::time::Duration;

use crate::constants;

// ============================================================================
// OPERATING MODE
// ============================================================================

/// Operating mode of the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    /// Offline-only: regex detection, no AI calls
    Standard,
    /// AI-assisted: semantic detection, sanitization, explanations
    Enterprise,
}

impl AgentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Standard => "STANDARD",
            AgentMode::Enterprise => "ENTERPRISE",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ENTERPRISE" => AgentMode::Enterprise,
            _ => AgentMode::Standard,
        }
    }
}

impl std::fmt::Display for AgentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// AGENT CONFIG
// ============================================================================

/// Immutable configuration snapshot
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub mode: AgentMode,
    pub policy_name: String,
    pub policy_dir: String,
    pub show_toasts: bool,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
}

impl AgentConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            mode: AgentMode::from_str(&constants::get_mode()),
            policy_name: constants::get_policy_name(),
            policy_dir: constants::get_policy_dir(),
            show_toasts: constants::toasts_enabled(),
            api_key: constants::get_api_key(),
            poll_interval: constants::get_poll_interval(),
        }
    }

    /// AI capabilities require enterprise mode AND a credential
    pub fn ai_enabled(&self) -> bool {
        self.mode == AgentMode::Enterprise && self.api_key.is_some()
    }

    /// Semantic leak detection runs only in enterprise mode
    pub fn semantic_enabled(&self) -> bool {
        self.mode == AgentMode::Enterprise
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: AgentMode::Standard,
            policy_name: constants::DEFAULT_POLICY_NAME.to_string(),
            policy_dir: constants::DEFAULT_POLICY_DIR.to_string(),
            show_toasts: true,
            api_key: None,
            poll_interval: Duration::from_millis(constants::DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(AgentMode::from_str("enterprise"), AgentMode::Enterprise);
        assert_eq!(AgentMode::from_str("ENTERPRISE"), AgentMode::Enterprise);
        assert_eq!(AgentMode::from_str("standard"), AgentMode::Standard);
        assert_eq!(AgentMode::from_str("garbage"), AgentMode::Standard);
    }

    #[test]
    fn test_ai_gate_requires_mode_and_credential() {
        let mut config = AgentConfig::default();
        assert!(!config.ai_enabled());

        config.api_key = Some("key".to_string());
        assert!(!config.ai_enabled(), "credential alone must not enable AI");

        config.mode = AgentMode::Enterprise;
        assert!(config.ai_enabled());

        config.api_key = None;
        assert!(!config.ai_enabled(), "enterprise mode alone must not enable AI");
    }

    #[test]
    fn test_semantic_follows_mode() {
        let mut config = AgentConfig::default();
        assert!(!config.semantic_enabled());
        config.mode = AgentMode::Enterprise;
        assert!(config.semantic_enabled());
    }
}
