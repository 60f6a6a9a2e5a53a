//! Blip Endpoint Sentinel - Main Entry Point
//!
//! Wires the dependency objects together once at startup and runs the
//! polling loop until interrupted. No globals: every component receives
//! its collaborators by reference.

mod constants;
mod error;
mod logic;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use logic::ai_bridge::{GeminiClient, ImageAnalyzer, TextSanitizer, ThreatExplainer};
use logic::collector::{ClipboardPort, MemoryClipboard};
use logic::config::{AgentConfig, AgentMode};
use logic::incident::IncidentRecorder;
use logic::policy::PolicyEngine;
use logic::response::{ActionStateMachine, ConsolePresenter};
use logic::threat::NullSemanticDetector;
use logic::watch::ClipboardWatcher;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} v{} starting...", constants::APP_NAME, constants::APP_VERSION);

    let config = AgentConfig::from_env();
    log::info!("Mode: {}, policy: '{}'", config.mode, config.policy_name);

    if config.mode == AgentMode::Enterprise && config.api_key.is_none() {
        log::warn!("GEMINI_API_KEY not set - enterprise AI features are disabled");
    }

    let clipboard = open_clipboard();
    run_agent(&config, clipboard.as_ref());
}

fn open_clipboard() -> Box<dyn ClipboardPort> {
    #[cfg(feature = "system-clipboard")]
    {
        match logic::collector::SystemClipboard::new() {
            Ok(clipboard) => return Box::new(clipboard),
            Err(e) => {
                log::warn!("System clipboard unavailable ({}), monitoring an inert stub", e);
            }
        }
    }
    #[cfg(not(feature = "system-clipboard"))]
    log::warn!("Built without the system-clipboard feature - monitoring an inert stub");

    Box::new(MemoryClipboard::new())
}

fn run_agent(config: &AgentConfig, clipboard: &dyn ClipboardPort) {
    let gemini = config
        .api_key
        .as_deref()
        .filter(|_| config.ai_enabled())
        .map(GeminiClient::new);

    let sanitizer: Option<&dyn TextSanitizer> = gemini.as_ref().map(|g| g as &dyn TextSanitizer);
    let explainer: Option<&dyn ThreatExplainer> = gemini.as_ref().map(|g| g as &dyn ThreatExplainer);
    let image_analyzer: Option<&dyn ImageAnalyzer> = gemini.as_ref().map(|g| g as &dyn ImageAnalyzer);

    // No semantic index ships with the core; enterprise hosts plug their own
    // detector in through this seam.
    let semantic = NullSemanticDetector;

    log::info!(
        "{} detection patterns loaded",
        logic::threat::patterns::pattern_count()
    );

    let policy = PolicyEngine::from_config(config);
    let recorder = IncidentRecorder::new(IncidentRecorder::default_path());
    log::info!("Incident store: {:?}", recorder.path());

    let presenter = ConsolePresenter::new();
    let actions = ActionStateMachine::new(
        clipboard,
        &presenter,
        sanitizer,
        explainer,
        &recorder,
        config.show_toasts,
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            log::warn!("Could not install interrupt handler: {}", e);
        }
    }

    let mut watcher =
        ClipboardWatcher::new(config, clipboard, &semantic, image_analyzer, &policy, &actions);
    watcher.run(&stop);

    log::info!("{} shutting down. Stay safe.", constants::APP_NAME);
}
