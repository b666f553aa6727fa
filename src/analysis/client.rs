//! Core `Analyzer` trait and the `GeminiAnalyzer` implementation.
//!
//! `GeminiAnalyzer` performs exactly one `generateContent` call per
//! [`Analyzer::analyze`] invocation. There is no retry and no local timeout;
//! the queue decides whether and when to call again.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::prompt::{user_message, SYSTEM_INSTRUCTION, TEMPERATURE, TOP_K, TOP_P};
use crate::config::AnalysisConfig;

/// Message used when the provider fails without saying why.
const GENERIC_FAILURE: &str = "Failed to analyze transcript.";

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Errors that can occur during a single analysis call.
///
/// Every variant displays as a non-empty, user-facing message; the queue
/// stores that message on the failed entry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key in the environment. Checked before any network activity.
    #[error("API key is not configured (set the {0} environment variable).")]
    Configuration(String),

    /// The request failed in transit or the provider rejected it.
    #[error("{0}")]
    Provider(String),

    /// The provider answered but produced no text.
    #[error("No analysis generated from the model.")]
    EmptyResponse,
}

impl AnalysisError {
    /// Build a [`AnalysisError::Provider`], substituting a generic message
    /// when the provider's message is blank.
    pub fn provider(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            AnalysisError::Provider(GENERIC_FAILURE.to_string())
        } else {
            AnalysisError::Provider(message)
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::provider(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Analyzer trait
// ---------------------------------------------------------------------------

/// Async trait for transcript analysis backends.
///
/// Implementors must be `Send + Sync` so the queue can share them as
/// `Arc<dyn Analyzer>` across tokio tasks.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze one transcript and return the model's text verbatim.
    async fn analyze(&self, content: &str) -> Result<String, AnalysisError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// GeminiAnalyzer
// ---------------------------------------------------------------------------

/// Calls the Gemini `models/{model}:generateContent` endpoint.
///
/// Connection details come from [`AnalysisConfig`]. The API key is read from
/// the environment variable named by `api_key_env` on every call, so a key
/// exported after startup is picked up without restarting.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl GeminiAnalyzer {
    /// Build a `GeminiAnalyzer` from application config.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// JSON body for one analysis request.
    pub fn build_request_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": user_message(content) }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "topP": TOP_P,
                "topK": TOP_K
            }
        })
    }

    /// Concatenated text parts of the first candidate, if any.
    pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts = &response.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Best-effort message from a non-2xx response body.
    pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.message.trim().is_empty() => envelope.error.message,
            _ => format!("Gemini API error {status}"),
        }
    }

    fn api_key(&self) -> Result<String, AnalysisError> {
        match std::env::var(&self.config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AnalysisError::Configuration(
                self.config.api_key_env.clone(),
            )),
        }
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, content: &str) -> Result<String, AnalysisError> {
        let api_key = self.api_key()?;

        log::info!(
            "analysis: sending transcript ({} chars) to {}",
            content.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request_body(content))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(status, &body);
            log::warn!("analysis: provider returned {status}: {message}");
            return Err(AnalysisError::provider(message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::provider(format!("failed to parse response: {e}")))?;

        Self::extract_text(&parsed).ok_or(AnalysisError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key_env: &str, base_url: &str) -> AnalysisConfig {
        AnalysisConfig {
            base_url: base_url.into(),
            model: "gemini-test".into(),
            api_key_env: api_key_env.into(),
        }
    }

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("valid response json")
    }

    #[test]
    fn request_body_carries_instruction_and_sampling() {
        let body = GeminiAnalyzer::build_request_body("Agent: hi");

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Transcript to analyze:\n\nAgent: hi"
        );
        assert_eq!(body["generationConfig"]["topK"], 40);

        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        let top_p = body["generationConfig"]["topP"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert!((top_p - 0.8).abs() < 1e-6);
    }

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let analyzer = GeminiAnalyzer::from_config(&make_config("X", "http://host:1/"));
        assert_eq!(
            analyzer.endpoint(),
            "http://host:1/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn extract_text_concatenates_parts() {
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "## A\n" }, { "text": "body" }] }
            }]
        }));
        assert_eq!(
            GeminiAnalyzer::extract_text(&response).as_deref(),
            Some("## A\nbody")
        );
    }

    #[test]
    fn extract_text_keeps_whitespace_verbatim() {
        let response = parse(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  padded\n\n" }] } }]
        }));
        assert_eq!(
            GeminiAnalyzer::extract_text(&response).as_deref(),
            Some("  padded\n\n")
        );
    }

    #[test]
    fn extract_text_none_without_candidates() {
        let response = parse(serde_json::json!({ "candidates": [] }));
        assert!(GeminiAnalyzer::extract_text(&response).is_none());

        let response = parse(serde_json::json!({}));
        assert!(GeminiAnalyzer::extract_text(&response).is_none());
    }

    #[test]
    fn extract_text_none_for_blocked_candidate() {
        let response = parse(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }));
        assert!(GeminiAnalyzer::extract_text(&response).is_none());
    }

    #[test]
    fn error_message_passes_provider_message_through() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let msg = GeminiAnalyzer::error_message(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(msg, "API key not valid.");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let msg = GeminiAnalyzer::error_message(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert!(msg.contains("502"));
    }

    #[test]
    fn blank_provider_message_uses_generic_fallback() {
        let err = AnalysisError::provider("   ");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn every_error_displays_non_empty() {
        let errors = [
            AnalysisError::Configuration("API_KEY".into()),
            AnalysisError::provider("boom"),
            AnalysisError::EmptyResponse,
        ];
        for err in errors {
            assert!(!err.to_string().trim().is_empty());
        }
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let analyzer = GeminiAnalyzer::from_config(&make_config(
            "AUDITPRO_TEST_KEY_THAT_IS_NEVER_SET",
            // Unroutable: reaching the network here would be a bug.
            "http://192.0.2.1",
        ));

        let err = analyzer.analyze("transcript").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(ref var)
            if var == "AUDITPRO_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn transport_errors_become_provider_errors() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("relative url must not build");

        let err = AnalysisError::from(err);
        assert!(matches!(err, AnalysisError::Provider(_)));
        assert!(!err.to_string().trim().is_empty());
    }

    #[test]
    fn analyzer_is_object_safe() {
        let analyzer: Box<dyn Analyzer> =
            Box::new(GeminiAnalyzer::from_config(&AnalysisConfig::default()));
        drop(analyzer);
    }
}
