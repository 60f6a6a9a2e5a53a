//! AI Bridge - Remote Capability Client
//!
//! Narrow contracts over the generative-AI service: text sanitization,
//! image sensitivity analysis, threat explanation. The state machine and
//! watcher depend on the traits, never on this client directly, so tests
//! substitute scripted capabilities.
//!
//! Failure contract (applied here, once):
//! - `sanitize` returns a clearly marked error STRING, never an Err
//! - `explain` returns an empty string on any failure
//! - `analyze` returns Err and the call site fails open

use base64::Engine as _;
use serde::Deserialize;

use crate::constants::AI_CALL_TIMEOUT_SECS;
use crate::error::CapabilityError;
use crate::logic::collector::ClipboardImage;
use crate::logic::threat::SignalSource;

// ============================================================================
// CONSTANTS
// ============================================================================

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used for all capability calls
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Marker prefix for sanitize failures surfaced as content
const ERROR_MARK: &str = "[BLIP ERROR]";

// ============================================================================
// CAPABILITY INTERFACES
// ============================================================================

/// Verdict from the image sensitivity analyzer
#[derive(Debug, Clone)]
pub struct ImageVerdict {
    pub is_sensitive: bool,
    pub reason: String,
}

/// Produces a redacted replacement for sensitive text.
/// Never fails: unavailability is reported inside the returned string,
/// marked with `[BLIP ERROR]`.
pub trait TextSanitizer {
    fn sanitize(&self, text: &str) -> String;
}

/// Classifies a clipboard image as sensitive or not
pub trait ImageAnalyzer {
    fn analyze(&self, image: &ClipboardImage) -> Result<ImageVerdict, CapabilityError>;
}

/// Produces a short natural-language explanation of a threat.
/// Never blocks the decision flow: empty string when unavailable.
pub trait ThreatExplainer {
    fn explain(&self, kind: &str, description: &str, source: SignalSource) -> String;
}

// ============================================================================
// GEMINI CLIENT
// ============================================================================

pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(std::time::Duration::from_secs(AI_CALL_TIMEOUT_SECS))
                .build(),
            api_key: api_key.to_string(),
            model: GEMINI_MODEL.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        )
    }

    /// Send one request and pull the first candidate's text out of the reply
    fn generate(&self, parts: serde_json::Value) -> Result<String, CapabilityError> {
        if self.api_key.is_empty() {
            return Err(CapabilityError::Unavailable {
                reason: "missing API key".to_string(),
            });
        }

        let body = serde_json::json!({ "contents": [ { "parts": parts } ] });

        let response = self
            .agent
            .post(&self.endpoint())
            .set("Content-Type", "application/json")
            .send_string(&body.to_string())
            .map_err(|e| CapabilityError::Network(e.to_string()))?;

        let raw = response
            .into_string()
            .map_err(|e| CapabilityError::Network(e.to_string()))?;

        extract_candidate_text(&raw)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn extract_candidate_text(raw: &str) -> Result<String, CapabilityError> {
    let parsed: GenerateResponse =
        serde_json::from_str(raw).map_err(|e| CapabilityError::Malformed(e.to_string()))?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text.trim().to_string())
        .ok_or_else(|| CapabilityError::Malformed("no candidates in response".to_string()))
}

// ============================================================================
// SANITIZE
// ============================================================================

impl TextSanitizer for GeminiClient {
    fn sanitize(&self, text: &str) -> String {
        let prompt = format!(
            "You are a Data Loss Prevention (DLP) security agent.\n\
             \n\
             TASK:\n\
             Sanitize the following text by replacing ANY sensitive information with [REDACTED_TYPE].\n\
             Sensitive info includes: API Keys, Passwords, Credit Card Numbers, Aadhaar IDs, PAN, Emails, Phone Numbers.\n\
             \n\
             RULES:\n\
             1. PRESERVE the original structure and non-sensitive words exactly.\n\
             2. DO NOT add conversational filler (e.g., \"Here is the text\").\n\
             3. ONLY output the sanitized text.\n\
             \n\
             INPUT TEXT:\n\
             \"{}\"",
            text
        );

        match self.generate(serde_json::json!([{ "text": prompt }])) {
            Ok(sanitized) => sanitized,
            Err(e) => {
                log::warn!("Sanitization call failed: {}", e);
                format!("{} Sanitization failed: {}", ERROR_MARK, e)
            }
        }
    }
}

// ============================================================================
// EXPLAIN
// ============================================================================

impl ThreatExplainer for GeminiClient {
    fn explain(&self, kind: &str, description: &str, source: SignalSource) -> String {
        let prompt = format!(
            "In at most two plain sentences, explain to an office worker why \
             copying this to the {} clipboard is risky and what could go wrong \
             if it leaks. Threat type: {}. Detail: {}. \
             Do not use markdown or bullet points.",
            source, kind, description
        );

        match self.generate(serde_json::json!([{ "text": prompt }])) {
            Ok(explanation) => explanation,
            Err(e) => {
                log::debug!("Explanation call failed ({}), continuing without one", e);
                String::new()
            }
        }
    }
}

// ============================================================================
// IMAGE ANALYSIS
// ============================================================================

impl ImageAnalyzer for GeminiClient {
    fn analyze(&self, image: &ClipboardImage) -> Result<ImageVerdict, CapabilityError> {
        let prompt = "You are a Data Loss Prevention (DLP) security agent. \
                      Decide whether this image contains sensitive content: ID cards, \
                      credit cards, credentials, screenshots of internal dashboards or \
                      source code, financial documents. \
                      Answer with STRICT JSON only: {\"sensitive\": true|false, \"reason\": \"<short reason>\"}";

        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let parts = serde_json::json!([
            { "text": prompt },
            { "inline_data": { "mime_type": sniff_mime(&image.bytes), "data": encoded } }
        ]);

        let raw = self.generate(parts)?;
        Ok(parse_image_verdict(&raw))
    }
}

/// Clipboard backends hand over whatever encoding the source application
/// used; pick the mime type from the magic bytes.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else {
        "image/png"
    }
}

#[derive(Deserialize)]
struct RawImageVerdict {
    sensitive: bool,
    #[serde(default)]
    reason: String,
}

/// Parse the classifier's reply. A conforming reply is strict JSON; anything
/// else falls back to a conservative keyword heuristic - the raw text must
/// simultaneously contain a positive verdict keyword and a sensitivity
/// keyword before we flag.
pub fn parse_image_verdict(raw: &str) -> ImageVerdict {
    // Models sometimes wrap the JSON in a code fence
    let stripped = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(verdict) = serde_json::from_str::<RawImageVerdict>(stripped) {
        return ImageVerdict {
            is_sensitive: verdict.sensitive,
            reason: if verdict.reason.is_empty() {
                "unspecified".to_string()
            } else {
                verdict.reason
            },
        };
    }

    let lower = raw.to_lowercase();
    let positive = lower.contains("yes") || lower.contains("true");
    let sensitivity = lower.contains("sensitive") || lower.contains("confidential");

    ImageVerdict {
        is_sensitive: positive && sensitivity,
        reason: format!("non-conforming classifier reply: {}", raw.trim()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
