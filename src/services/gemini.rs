// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Gemini API client for text generation.
//!
//! Speaks the `generateContent` REST endpoint directly. Requests carry a
//! list of parts, so a plain prompt and a prompt-plus-image go through the
//! same path. Callers treat every error as non-fatal.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client for the given model.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
            api_key,
            model,
        }
    }

    /// Override the API base URL (for testing against a mock server).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Generate text from a plain prompt.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        self.generate(vec![Part::text(prompt)]).await
    }

    /// Generate text from a prompt plus an inline image.
    pub async fn generate_with_image(
        &self,
        prompt: &str,
        mime_type: &str,
        image_base64: &str,
    ) -> Result<String, GeminiError> {
        self.generate(vec![
            Part::text(prompt),
            Part::inline_data(mime_type, image_base64),
        ])
        .await
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Network(format!("Failed to parse response: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::MissingContent);
        }

        Ok(text)
    }
}

/// Errors from the Gemini API boundary.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response contained no text content")]
    MissingContent,
}

// ─── Wire Types ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: String) -> GeminiClient {
        GeminiClient::new("test-api-key".to_string(), "gemini-test".to_string())
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn generates_text_successfully() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{"text": "Hello "}, {"text": "world"}]
                    }
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let text = client.generate_text("hi").await.expect("should generate");

        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn surfaces_api_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let err = client.generate_text("hi").await.unwrap_err();

        assert!(matches!(err, GeminiError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn missing_candidates_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(mock_server.uri());
        let err = client.generate_text("hi").await.unwrap_err();

        assert!(matches!(err, GeminiError::MissingContent));
    }
}
