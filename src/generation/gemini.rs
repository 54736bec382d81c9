//! Gemini `generateContent` REST client
//!
//! Thin blocking HTTP wrapper. Request building and response parsing are
//! pure functions so they can be tested without a network.

use super::prompts::{
    analysis_prompt, audit_prompt, generation_prompt, ANALYSIS_INSTRUCTION, AUDIT_INSTRUCTION,
    GENERATOR_INSTRUCTION,
};
use super::{Generator, Operation};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Characters of an error body kept in logs
const ERROR_BODY_LOG_CHARS: usize = 500;

/// Sampling parameters for one call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampling {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: Sampling,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Build the JSON request body
pub fn build_request(
    system: &str,
    prompt: &str,
    sampling: Sampling,
    search_grounding: bool,
) -> serde_json::Result<serde_json::Value> {
    let body = ApiRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: prompt }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part { text: system }],
        },
        generation_config: sampling,
        tools: if search_grounding {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        },
    };
    serde_json::to_value(body)
}

/// Extract the answer text from a response body
///
/// The answer is the concatenation of the first candidate's non-thought
/// text parts. The error is a diagnostic for logs.
pub fn parse_response(json: &str) -> std::result::Result<String, String> {
    let api: ApiResponse =
        serde_json::from_str(json).map_err(|e| format!("response parse failed: {}", e))?;

    if let Some(reason) = api.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(format!("prompt blocked: {}", reason));
    }

    let candidate = api
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "response has no candidates".to_string())?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "unknown".to_string());
        return Err(format!("empty answer (finish reason: {})", reason));
    }

    Ok(text)
}

/// Client for the hosted Gemini model
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Create a client with an explicit API key
    pub fn new(api_key: String, config: GenerationConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Create a client, reading the API key from the configured variable
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::new(api_key, config.clone())
    }

    /// The `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn call(
        &self,
        operation: Operation,
        system: &str,
        prompt: &str,
        sampling: Sampling,
        search_grounding: bool,
    ) -> Result<String> {
        let body = build_request(system, prompt, sampling, search_grounding)?;
        debug!(
            operation = operation.name(),
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "calling generation service"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| operation.fail(&e))?;

        let status = response.status();
        let text = response.text().map_err(|e| operation.fail(&e))?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(ERROR_BODY_LOG_CHARS).collect();
            return Err(operation.fail(&format!("status {}: {}", status.as_u16(), excerpt)));
        }

        let answer = parse_response(&text).map_err(|e| operation.fail(&e))?;
        debug!(
            operation = operation.name(),
            answer_chars = answer.len(),
            "generation service answered"
        );
        Ok(answer)
    }
}

impl Generator for GeminiClient {
    fn generate(&self, brand_voice: &str, request: &str) -> Result<String> {
        self.call(
            Operation::Generate,
            GENERATOR_INSTRUCTION,
            &generation_prompt(brand_voice, request),
            Sampling {
                temperature: self.config.generate_temperature,
                top_p: Some(self.config.generate_top_p),
            },
            false,
        )
    }

    fn analyze_voice(&self, identifier: &str) -> Result<String> {
        self.call(
            Operation::Analyze,
            ANALYSIS_INSTRUCTION,
            &analysis_prompt(identifier),
            Sampling {
                temperature: self.config.analysis_temperature,
                top_p: None,
            },
            self.config.search_grounding,
        )
    }

    fn audit(&self, brand_voice: &str, content: &str) -> Result<String> {
        self.call(
            Operation::Audit,
            AUDIT_INSTRUCTION,
            &audit_prompt(brand_voice, content),
            Sampling {
                temperature: self.config.audit_temperature,
                top_p: None,
            },
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_response(parts: serde_json::Value) -> String {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.5-flash"
        })
        .to_string()
    }

    #[test]
    fn test_build_request_shape() {
        let body = build_request(
            "system text",
            "prompt text",
            Sampling {
                temperature: 0.8,
                top_p: Some(0.95),
            },
            false,
        )
        .unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt text");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "system text");
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body["generationConfig"]["topP"].is_number());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_build_request_with_search_grounding() {
        let body = build_request(
            "s",
            "p",
            Sampling {
                temperature: 0.5,
                top_p: None,
            },
            true,
        )
        .unwrap();
        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
        assert!(body["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn test_parse_text_response() {
        let json = make_response(json!([{ "text": "Hello " }, { "text": "world" }]));
        assert_eq!(parse_response(&json).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let json = make_response(json!([
            { "text": "thinking...", "thought": true },
            { "text": "Answer" }
        ]));
        assert_eq!(parse_response(&json).unwrap(), "Answer");
    }

    #[test]
    fn test_parse_empty_answer_is_error() {
        let json = json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })
        .to_string();
        let err = parse_response(&json).unwrap_err();
        assert!(err.contains("SAFETY"));
    }

    #[test]
    fn test_parse_no_candidates() {
        assert!(parse_response("{}").is_err());
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let json = json!({ "promptFeedback": { "blockReason": "OTHER" } }).to_string();
        assert_eq!(parse_response(&json).unwrap_err(), "prompt blocked: OTHER");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_response("<html>").is_err());
    }

    #[test]
    fn test_endpoint() {
        let mut config = GenerationConfig::default();
        config.base_url = "https://example.test/".to_string();
        let client = GeminiClient::new("key".to_string(), config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = GenerationConfig::default();
        config.api_key_env = "BRANDMELD_TEST_UNSET_KEY_VARIABLE".to_string();
        let err = GeminiClient::from_config(&config).err().unwrap();
        assert!(matches!(err, Error::MissingApiKey { .. }));
    }

    #[test]
    fn test_unreachable_service_gives_generic_error() {
        let mut config = GenerationConfig::default();
        config.base_url = "http://127.0.0.1:9".to_string();
        config.connect_timeout_secs = 1;
        config.request_timeout_secs = 2;
        let client = GeminiClient::new("key".to_string(), config).unwrap();

        let err = client.audit("voice", "draft").unwrap_err();
        assert_eq!(err.to_string(), Operation::Audit.failure_message());
    }
}
