//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a default (poll interval, policy directory), only edit this file.

use std::time::Duration;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Blip Endpoint Sentinel";

/// Default inter-tick delay for the clipboard poll loop
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Inputs longer than this are never scanned (bounds worst-case regex cost)
pub const MAX_SCAN_LENGTH: usize = 100_000;

/// Inputs shorter than this are never sent to the semantic detector
/// (short strings produce excessive false positives against the index)
pub const MIN_SEMANTIC_LENGTH: usize = 30;

/// Default policy name when BLIP_POLICY is not set
pub const DEFAULT_POLICY_NAME: &str = "default";

/// Default directory searched for policy documents
pub const DEFAULT_POLICY_DIR: &str = "policies";

/// Timeout applied to every remote AI capability call
pub const AI_CALL_TIMEOUT_SECS: u64 = 20;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get operating mode from environment ("STANDARD" or "ENTERPRISE")
pub fn get_mode() -> String {
    std::env::var("BLIP_MODE").unwrap_or_else(|_| "STANDARD".to_string())
}

/// Get active policy name from environment or use default
pub fn get_policy_name() -> String {
    std::env::var("BLIP_POLICY").unwrap_or_else(|_| DEFAULT_POLICY_NAME.to_string())
}

/// Get policy directory from environment or use default
pub fn get_policy_dir() -> String {
    std::env::var("BLIP_POLICY_DIR").unwrap_or_else(|_| DEFAULT_POLICY_DIR.to_string())
}

/// Check if toast notifications are enabled
pub fn toasts_enabled() -> bool {
    std::env::var("BLIP_TOASTS")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Get poll interval from environment or use default
pub fn get_poll_interval() -> Duration {
    let ms = std::env::var("BLIP_POLL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    Duration::from_millis(ms)
}

/// Get the AI credential, if present
pub fn get_api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
}
