//! AI completion endpoint client
//!
//! The engine talks to the model through the [`CompletionClient`] trait so
//! tests can inject a scripted fake. [`GeminiClient`] is the production
//! implementation: a single POST per prompt against a Gemini-style
//! text-generation endpoint.

use crate::config::ApiConfig;
use crate::error::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the raw completion text. Any transport,
    /// status, or envelope problem comes back as an error; callers decide
    /// whether to retry or degrade.
    async fn complete(&self, prompt: &str) -> ScoutResult<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Production client for a Gemini-style completion endpoint.
///
/// Constructed explicitly and passed by reference; there is deliberately no
/// shared module-level instance.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(api: &ApiConfig) -> ScoutResult<Self> {
        let api_key = api
            .resolve_key()
            .ok_or_else(|| ScoutError::Config("no API key configured".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: api.endpoint.clone(),
            api_key,
            config: GenerationConfig {
                temperature: api.temperature,
                top_k: api.top_k,
                top_p: api.top_p,
                max_output_tokens: api.max_output_tokens,
            },
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> ScoutResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "AI endpoint returned error status");
            return Err(ScoutError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = response.json().await?;

        let text = envelope
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    candidates.swap_remove(0).content
                }
            })
            .and_then(|content| content.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ScoutError::Envelope("no completion text in candidates".to_string()))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 2048,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(json["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_envelope_missing_candidates_parses() {
        let envelope: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.candidates.is_none());

        let envelope: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
                .unwrap();
        let text = envelope.candidates.unwrap()[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .as_ref()
            .unwrap()[0]
            .text
            .clone();
        assert_eq!(text, Some("ok".to_string()));
    }
}
