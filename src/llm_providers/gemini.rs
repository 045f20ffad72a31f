use std::error::Error as _;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{GenerationBackend, GenerationConfig, RawResponse};
use crate::config::Config;
use crate::error::{StudyError, StudyResult};
use crate::log_debug;

/// Client for the Gemini `generateContent` REST endpoint
///
/// One instance per process; constructed explicitly and handed to generators.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    /// Creates a client from configuration; an empty key leaves it uninitialized
    pub fn new(config: &Config) -> Self {
        let api_key = config.effective_api_key();
        if api_key.is_none() {
            crate::log_warn!("No Gemini API key configured; generation calls will fail");
        }
        Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body for one call
pub(crate) fn build_request_body(
    user_content: &str,
    system_instruction: &str,
    config: &GenerationConfig,
) -> Value {
    let mut body = json!({
        "contents": [
            {
                "role": "user",
                "parts": [{"text": user_content}]
            }
        ]
    });

    if !system_instruction.is_empty() {
        body["systemInstruction"] = json!({"parts": [{"text": system_instruction}]});
    }
    if !config.tools.is_empty() {
        body["tools"] = json!(config.tools);
    }
    if let Some(mime) = &config.response_mime_type {
        body["generationConfig"] = json!({"responseMimeType": mime});
    }

    body
}

/// Most specific message from a failed call's body
///
/// Gemini wraps failures as `{"error": {"message": ...}}`; the nested message
/// is preferred, otherwise the raw body is used.
pub fn extract_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("got status: {status}. {}", body.trim()))
}

/// Innermost cause of a transport error, falling back to the error itself
fn transport_message(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = cause.to_string();
        source = cause.source();
    }
    message
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn execute(
        &self,
        user_content: &str,
        system_instruction: &str,
        config: &GenerationConfig,
    ) -> StudyResult<RawResponse> {
        let Some(api_key) = &self.api_key else {
            return Err(StudyError::Uninitialized);
        };

        let body = build_request_body(user_content, system_instruction, config);
        log_debug!(
            "Calling {} (web search: {}, {} prompt chars)",
            self.model,
            config.uses_web_search(),
            user_content.len()
        );

        let endpoint = self.endpoint();
        crate::trace_debug!(target: "study_circle::gemini", "POST {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudyError::Backend(transport_message(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| StudyError::Backend(transport_message(&e)))?;
            log_debug!("Gemini request failed with status {}: {}", status, text);
            return Err(StudyError::Backend(extract_error_message(status, &text)));
        }

        let raw: RawResponse = response
            .json()
            .await
            .map_err(|e| StudyError::Backend(transport_message(&e)))?;

        log_debug!("Gemini returned {} candidate(s)", raw.candidates.len());
        Ok(raw)
    }
}
