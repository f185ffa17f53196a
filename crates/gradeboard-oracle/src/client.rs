//! Oracle client
//!
//! [`Oracle`] is the outbound seam; [`GeminiOracle`] is the reference
//! backend, calling the structured-output REST endpoint so the service is
//! constrained to the verdict shape before local validation even runs.

use crate::error::OracleError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// The external structured-reasoning service.
#[async_trait]
pub trait Oracle: Send + Sync + std::fmt::Debug {
    /// Run one structured generation and return the raw JSON payload.
    ///
    /// # Errors
    /// Any [`OracleError`]; callers decide what crosses their own boundary.
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError>;
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiOracle {
    /// Client with the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Client from `GEMINI_API_KEY`, `None` when unset.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(ENV_API_KEY).ok().map(Self::new)
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        tracing::debug!(model = %self.model, prompt_bytes = prompt.len(), "invoking oracle");
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status: status.as_u16(), message });
        }

        let payload: GenerateContentResponse = response.json().await?;
        extract_payload(payload)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Pull the first candidate's text and parse it as JSON.
fn extract_payload(response: GenerateContentResponse) -> Result<Value, OracleError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or(OracleError::MissingContent)?;
    serde_json::from_str(&text).map_err(|error| OracleError::InvalidPayload(error.to_string()))
}

/// Response schema in the service's OpenAPI-style dialect.
///
/// Kept separate from the draft-07 schema used for local validation; the
/// service rejects `$schema`/`definitions` keywords.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": "Overall score from 1 to 10" },
            "feedback": { "type": "STRING" },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "weaknesses": { "type": "ARRAY", "items": { "type": "STRING" } },
            "missingComponents": { "type": "ARRAY", "items": { "type": "STRING" } },
            "securityRisks": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["score", "feedback", "strengths", "weaknesses", "missingComponents", "securityRisks"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn payload_extracted_from_first_candidate() {
        let response = response_from(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"score\": 7}" }] }
            }]
        }));
        let payload = extract_payload(response).unwrap();
        assert_eq!(payload["score"], 7);
    }

    #[test]
    fn empty_candidates_is_missing_content() {
        let response = response_from(json!({ "candidates": [] }));
        assert!(matches!(extract_payload(response), Err(OracleError::MissingContent)));

        let response = response_from(json!({}));
        assert!(matches!(extract_payload(response), Err(OracleError::MissingContent)));
    }

    #[test]
    fn empty_text_is_missing_content() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [{ "text": "" }] } }]
        }));
        assert!(matches!(extract_payload(response), Err(OracleError::MissingContent)));
    }

    #[test]
    fn non_json_text_is_invalid_payload() {
        let response = response_from(json!({
            "candidates": [{ "content": { "parts": [{ "text": "plain prose" }] } }]
        }));
        assert!(matches!(extract_payload(response), Err(OracleError::InvalidPayload(_))));
    }

    #[test]
    fn response_schema_requires_every_verdict_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(
            required,
            vec!["score", "feedback", "strengths", "weaknesses", "missingComponents", "securityRisks"]
        );
    }

    #[test]
    fn builder_overrides_model() {
        let oracle = GeminiOracle::new("key").with_model("gemini-2.0-flash");
        assert_eq!(oracle.model, "gemini-2.0-flash");
    }
}
