//! Alert Presenter Capability
//!
//! How a decision reaches the user and how their choice comes back. The
//! state machine depends on this trait only; the console implementation
//! below is what the standalone agent ships with.

use std::io::{BufRead, Write};

use super::types::{AlertContext, UserChoice};

// ============================================================================
// CAPABILITY INTERFACE
// ============================================================================

pub trait AlertPresenter {
    /// Present the decision and block until the user picks a choice
    fn prompt(&self, alert: &AlertContext) -> UserChoice;

    /// Fire-and-forget notification, no choice involved
    fn toast(&self, title: &str, message: &str);
}

// ============================================================================
// CONSOLE PRESENTER
// ============================================================================

/// Interactive terminal presenter. Reads a single-letter choice from stdin;
/// any read failure resolves to Block, the safe default.
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPresenter for ConsolePresenter {
    fn prompt(&self, alert: &AlertContext) -> UserChoice {
        println!();
        println!(
            "!! {} RISK DETECTED ({})",
            alert.risk_level, alert.enforcement
        );
        println!("   Type:   {}", alert.threat_type);
        println!("   Detail: {}", alert.description);
        if !alert.explanation.is_empty() {
            println!("   Why:    {}", alert.explanation);
        }

        let stdin = std::io::stdin();
        loop {
            print!("   [a]llow / [b]lock / [s]anitize > ");
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => {
                    // stdin gone: fail toward blocking
                    println!("b (input closed)");
                    return UserChoice::Block;
                }
                Ok(_) => {}
            }

            match line.trim().to_lowercase().as_str() {
                "a" | "allow" => return UserChoice::Allow,
                "b" | "block" => return UserChoice::Block,
                "s" | "sanitize" => return UserChoice::Sanitize,
                _ => continue,
            }
        }
    }

    fn toast(&self, title: &str, message: &str) {
        println!("[{}] {}", title, message);
    }
}
