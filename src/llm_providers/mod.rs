//! Generative backend seam
//!
//! Generators talk to the model through [`GenerationBackend`], so tests can
//! substitute a double that replays canned responses.

mod gemini;

pub use gemini::{GeminiClient, extract_error_message};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StudyResult;

/// Executes one composed request against the model
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// One outbound call; no retries at this layer
    async fn execute(
        &self,
        user_content: &str,
        system_instruction: &str,
        config: &GenerationConfig,
    ) -> StudyResult<RawResponse>;
}

/// A backend-side capability the model may invoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    /// Web-search augmentation; serialized as `{"googleSearch": {}}`
    GoogleSearch(EmptyObject),
}

impl Tool {
    pub fn google_search() -> Self {
        Self::GoogleSearch(EmptyObject {})
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyObject {}

/// Per-call generation settings
///
/// Tools and a forced response MIME type are mutually exclusive in the
/// backend's contract; [`GenerationConfig::augmented`] and
/// [`GenerationConfig::structured_json`] are the two valid shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    pub fn augmented() -> Self {
        Self {
            tools: vec![Tool::google_search()],
            response_mime_type: None,
        }
    }

    pub fn structured_json() -> Self {
        Self {
            tools: Vec::new(),
            response_mime_type: Some("application/json".to_string()),
        }
    }

    pub fn uses_web_search(&self) -> bool {
        self.tools.iter().any(|t| matches!(t, Tool::GoogleSearch(_)))
    }
}

/// Response body of `generateContent`, keeping only what we read
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl RawResponse {
    /// Concatenated text parts of the first candidate, or empty
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Convenience constructor for a single text candidate
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ResponsePart {
                        text: Some(text.into()),
                        thought: false,
                    }],
                }),
                grounding_metadata: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_shapes_are_exclusive() {
        let augmented = GenerationConfig::augmented();
        assert!(augmented.uses_web_search());
        assert!(augmented.response_mime_type.is_none());
        assert_eq!(
            serde_json::to_value(&augmented).expect("serializes"),
            json!({"tools": [{"googleSearch": {}}]})
        );

        let structured = GenerationConfig::structured_json();
        assert!(!structured.uses_web_search());
        assert_eq!(
            serde_json::to_value(&structured).expect("serializes"),
            json!({"responseMimeType": "application/json"})
        );
    }

    #[test]
    fn test_response_text_joins_parts_and_skips_thoughts() {
        let raw: RawResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"notes\":"},
                    {"text": " \"x\"}"}
                ]}
            }]
        }))
        .expect("response parses");
        assert_eq!(raw.text(), "{\"notes\": \"x\"}");
    }

    #[test]
    fn test_response_without_candidates_has_empty_text() {
        let raw: RawResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
                .expect("blocked response parses");
        assert_eq!(raw.text(), "");
    }
}
