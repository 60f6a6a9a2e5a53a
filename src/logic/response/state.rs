//! Action State Machine
//!
//! Drives one decision cycle from PENDING to a terminal state: presents the
//! decision (unless enforcement is LOG), applies the chosen action to the
//! clipboard, emits exactly one `ActionOutcome` to the incident recorder,
//! and tells the watcher how to update its dedup memory.

use super::presenter::AlertPresenter;
use super::types::{ActionOutcome, ActionTaken, AlertContext, CycleResult, DedupUpdate, UserChoice};
use crate::logic::ai_bridge::{TextSanitizer, ThreatExplainer};
use crate::logic::collector::ClipboardPort;
use crate::logic::incident::IncidentRecorder;
use crate::logic::policy::{Enforcement, PolicyDecision};
use crate::logic::threat::SignalSource;

// ============================================================================
// STATE MACHINE
// ============================================================================

pub struct ActionStateMachine<'a> {
    clipboard: &'a dyn ClipboardPort,
    presenter: &'a dyn AlertPresenter,
    /// None when sanitization is not configured/enabled; the machine then
    /// wipes instead of calling anything remote
    sanitizer: Option<&'a dyn TextSanitizer>,
    /// None disables explanations entirely
    explainer: Option<&'a dyn ThreatExplainer>,
    recorder: &'a IncidentRecorder,
    show_toasts: bool,
}

impl<'a> ActionStateMachine<'a> {
    pub fn new(
        clipboard: &'a dyn ClipboardPort,
        presenter: &'a dyn AlertPresenter,
        sanitizer: Option<&'a dyn TextSanitizer>,
        explainer: Option<&'a dyn ThreatExplainer>,
        recorder: &'a IncidentRecorder,
        show_toasts: bool,
    ) -> Self {
        Self {
            clipboard,
            presenter,
            sanitizer,
            explainer,
            recorder,
            show_toasts,
        }
    }

    /// Run one cycle to its terminal state.
    ///
    /// `observed_text` is the clipboard content captured at detection time;
    /// it feeds the sanitizer and is None for the image track.
    pub fn run(&self, decision: PolicyDecision, observed_text: Option<&str>) -> CycleResult {
        let (action, dedup) = if decision.enforcement == Enforcement::Log {
            // Silent path: resource untouched, user never involved
            (ActionTaken::Logged, DedupUpdate::Keep)
        } else {
            let choice = self.presenter.prompt(&self.alert_context(&decision));
            self.apply(&decision, choice, observed_text)
        };

        if self.show_toasts && action.wipes_resource() {
            self.presenter.toast(
                "Blip Security Alert",
                &format!("Blocked: {} detected on clipboard.", decision.signal.kind),
            );
        }

        let outcome = ActionOutcome::new(decision, action);
        log::info!("Cycle complete: {} -> {}", outcome.decision.signal.kind, action);
        self.recorder.record(&outcome);

        CycleResult { outcome, dedup }
    }

    fn alert_context(&self, decision: &PolicyDecision) -> AlertContext {
        let explanation = self
            .explainer
            .map(|e| {
                e.explain(
                    &decision.signal.kind,
                    &decision.signal.description,
                    decision.signal.source,
                )
            })
            .unwrap_or_default();

        AlertContext {
            threat_type: decision.signal.kind.clone(),
            description: decision.signal.description.clone(),
            risk_level: decision.risk_level,
            enforcement: decision.enforcement,
            explanation,
        }
    }

    fn apply(
        &self,
        decision: &PolicyDecision,
        choice: UserChoice,
        observed_text: Option<&str>,
    ) -> (ActionTaken, DedupUpdate) {
        match choice {
            UserChoice::Allow => (ActionTaken::Allowed, DedupUpdate::Keep),

            UserChoice::Block => {
                self.wipe(decision.signal.source);
                (ActionTaken::Blocked, DedupUpdate::Reset)
            }

            UserChoice::Sanitize => match decision.signal.source {
                // Images are never rewritten in place
                SignalSource::Image => {
                    self.wipe(SignalSource::Image);
                    (ActionTaken::BlockedImageSanitize, DedupUpdate::Reset)
                }
                SignalSource::Text => self.sanitize_text(observed_text.unwrap_or_default()),
            },
        }
    }

    fn sanitize_text(&self, original: &str) -> (ActionTaken, DedupUpdate) {
        let Some(sanitizer) = self.sanitizer else {
            // Capability not configured: no remote call, wipe instead
            self.wipe(SignalSource::Text);
            return (ActionTaken::SanitizeUnavailable, DedupUpdate::Reset);
        };

        let replacement = sanitizer.sanitize(original);

        if let Err(e) = self.clipboard.write_text(&replacement) {
            // Replacement could not be applied; fall back to a wipe so the
            // sensitive original does not stay on the clipboard
            log::error!("Failed to write sanitized replacement ({}), wiping instead", e);
            self.wipe(SignalSource::Text);
            return (ActionTaken::SanitizeUnavailable, DedupUpdate::Reset);
        }

        // Dedup against what the resource actually holds now, not what we
        // asked it to hold
        let written = self.clipboard.read_text().unwrap_or_default();
        (ActionTaken::Sanitized, DedupUpdate::Replace(written))
    }

    fn wipe(&self, source: SignalSource) {
        let result = match source {
            SignalSource::Text => self.clipboard.write_text(""),
            SignalSource::Image => self.clipboard.clear(),
        };
        if let Err(e) = result {
            log::error!("Failed to wipe clipboard: {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use tempfile::TempDir;

    use super::*;
    use crate::logic::collector::MemoryClipboard;
    use crate::logic::threat::{RiskLevel, ThreatSignal};

    // ------------------------------------------------------------------
    // Scripted capabilities
    // ------------------------------------------------------------------

    struct ScriptedPresenter {
        choices: RefCell<Vec<UserChoice>>,
        prompts: Cell<usize>,
        toasts: Cell<usize>,
    }

    impl ScriptedPresenter {
        fn returning(choices: &[UserChoice]) -> Self {
            let mut reversed: Vec<UserChoice> = choices.to_vec();
            reversed.reverse();
            Self {
                choices: RefCell::new(reversed),
                prompts: Cell::new(0),
                toasts: Cell::new(0),
            }
        }
    }

    impl AlertPresenter for ScriptedPresenter {
        fn prompt(&self, _alert: &AlertContext) -> UserChoice {
            self.prompts.set(self.prompts.get() + 1);
            self.choices.borrow_mut().pop().expect("unexpected prompt")
        }

        fn toast(&self, _title: &str, _message: &str) {
            self.toasts.set(self.toasts.get() + 1);
        }
    }

    struct FixedSanitizer(&'static str);

    impl TextSanitizer for FixedSanitizer {
        fn sanitize(&self, _text: &str) -> String {
            self.0.to_string()
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn decision(source: SignalSource, enforcement: Enforcement) -> PolicyDecision {
        PolicyDecision {
            signal: ThreatSignal::new("Aadhaar Number", "Indian National ID (UIDAI)", RiskLevel::High, source),
            risk_level: RiskLevel::High,
            enforcement,
        }
    }

    fn recorder(dir: &TempDir) -> IncidentRecorder {
        IncidentRecorder::new(dir.path().join("threats.json"))
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    #[test]
    fn test_log_enforcement_never_prompts() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("4589 1234 5678");
        let presenter = ScriptedPresenter::returning(&[]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, true);

        let result = machine.run(decision(SignalSource::Text, Enforcement::Log), Some("4589 1234 5678"));

        assert_eq!(result.outcome.action, ActionTaken::Logged);
        assert_eq!(result.dedup, DedupUpdate::Keep);
        assert_eq!(presenter.prompts.get(), 0, "LOG must not reach the presenter");
        // Resource left untouched
        assert_eq!(clipboard.read_text().unwrap(), "4589 1234 5678");
        // Exactly one outcome recorded
        assert_eq!(store.load().len(), 1);
        assert_eq!(store.load()[0].action_taken, "LOGGED");
    }

    #[test]
    fn test_block_wipes_and_resets_dedup() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("4589 1234 5678");
        let presenter = ScriptedPresenter::returning(&[UserChoice::Block]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, true);

        let result = machine.run(decision(SignalSource::Text, Enforcement::Block), Some("4589 1234 5678"));

        assert_eq!(result.outcome.action, ActionTaken::Blocked);
        assert_eq!(result.dedup, DedupUpdate::Reset);
        assert_eq!(clipboard.read_text().unwrap(), "");
        assert_eq!(presenter.toasts.get(), 1);
    }

    #[test]
    fn test_allow_leaves_resource_untouched() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("4589 1234 5678");
        let presenter = ScriptedPresenter::returning(&[UserChoice::Allow]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, true);

        let result = machine.run(decision(SignalSource::Text, Enforcement::Warn), Some("4589 1234 5678"));

        assert_eq!(result.outcome.action, ActionTaken::Allowed);
        assert_eq!(result.dedup, DedupUpdate::Keep);
        assert_eq!(clipboard.read_text().unwrap(), "4589 1234 5678");
        assert_eq!(presenter.toasts.get(), 0);
    }

    #[test]
    fn test_sanitize_writes_replacement_and_updates_dedup() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("my id is 4589 1234 5678");
        let presenter = ScriptedPresenter::returning(&[UserChoice::Sanitize]);
        let sanitizer = FixedSanitizer("my id is [REDACTED_AADHAAR]");
        let store = recorder(&dir);
        let machine =
            ActionStateMachine::new(&clipboard, &presenter, Some(&sanitizer), None, &store, true);

        let result = machine.run(
            decision(SignalSource::Text, Enforcement::Block),
            Some("my id is 4589 1234 5678"),
        );

        assert_eq!(result.outcome.action, ActionTaken::Sanitized);
        assert_eq!(
            result.dedup,
            DedupUpdate::Replace("my id is [REDACTED_AADHAAR]".to_string())
        );
        assert_eq!(clipboard.read_text().unwrap(), "my id is [REDACTED_AADHAAR]");
    }

    #[test]
    fn test_sanitize_without_capability_wipes_instead() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        clipboard.put_text("4589 1234 5678");
        let presenter = ScriptedPresenter::returning(&[UserChoice::Sanitize]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, true);

        let result = machine.run(decision(SignalSource::Text, Enforcement::Block), Some("4589 1234 5678"));

        assert_eq!(result.outcome.action, ActionTaken::SanitizeUnavailable);
        assert_eq!(result.dedup, DedupUpdate::Reset);
        assert_eq!(clipboard.read_text().unwrap(), "");
        assert_eq!(store.load()[0].action_taken, "SANITIZE_UNAVAILABLE");
    }

    #[test]
    fn test_sanitize_on_image_is_a_safety_block() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        let presenter = ScriptedPresenter::returning(&[UserChoice::Sanitize]);
        // Sanitizer configured, but must not be used for images
        let sanitizer = FixedSanitizer("never used");
        let store = recorder(&dir);
        let machine =
            ActionStateMachine::new(&clipboard, &presenter, Some(&sanitizer), None, &store, true);

        let result = machine.run(decision(SignalSource::Image, Enforcement::Block), None);

        assert_eq!(result.outcome.action, ActionTaken::BlockedImageSanitize);
        assert_eq!(result.dedup, DedupUpdate::Reset);
    }

    #[test]
    fn test_every_cycle_records_exactly_one_outcome() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        let presenter =
            ScriptedPresenter::returning(&[UserChoice::Allow, UserChoice::Block, UserChoice::Sanitize]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, false);

        machine.run(decision(SignalSource::Text, Enforcement::Warn), Some("v"));
        machine.run(decision(SignalSource::Text, Enforcement::Block), Some("v"));
        machine.run(decision(SignalSource::Text, Enforcement::Block), Some("v"));
        machine.run(decision(SignalSource::Text, Enforcement::Log), Some("v"));

        let records = store.load();
        assert_eq!(records.len(), 4);
        let actions: Vec<&str> = records.iter().map(|r| r.action_taken.as_str()).collect();
        assert_eq!(actions, vec!["ALLOWED", "BLOCKED", "SANITIZE_UNAVAILABLE", "LOGGED"]);
    }

    #[test]
    fn test_toasts_suppressed_when_disabled() {
        let dir = TempDir::new().unwrap();
        let clipboard = MemoryClipboard::new();
        let presenter = ScriptedPresenter::returning(&[UserChoice::Block]);
        let store = recorder(&dir);
        let machine = ActionStateMachine::new(&clipboard, &presenter, None, None, &store, false);

        machine.run(decision(SignalSource::Text, Enforcement::Block), Some("v"));
        assert_eq!(presenter.toasts.get(), 0);
    }
}
