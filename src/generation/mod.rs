//! Text generation boundary used by knowledge-base queries.
//!
//! Generation is optional; when no provider is configured, queries fail with a clear
//! "unavailable" error and every other corpus operation keeps working. Provider responses are
//! normalized to [`GeneratedText`] inside the adapter so corpus code never inspects raw payloads.

use crate::config::{Config, GenerationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while generating text.
#[derive(Debug, Error)]
pub enum GenerationClientError {
    /// Provider could not be constructed or reached.
    #[error("Generation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate text: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Prompt plus sampling settings handed to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Fully rendered prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Request with the sampling settings used for knowledge-base answers.
    pub fn knowledge_answer(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_tokens: 2048,
        }
    }
}

/// Normalized model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    /// Generated text with surrounding whitespace removed.
    pub text: String,
}

/// Interface implemented by text generation providers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Complete the prompt in `request`.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedText, GenerationClientError>;
}

/// Build the generation client selected by configuration, or `None` when disabled.
pub fn get_generation_client(
    config: &Config,
) -> Result<Option<Arc<dyn GenerationClient>>, GenerationClientError> {
    match config.generation_provider {
        GenerationProvider::None => Ok(None),
        GenerationProvider::Ollama => {
            let base_url = config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            tracing::debug!(
                url = %base_url,
                model = %config.generation_model,
                "Using Ollama for generation"
            );
            Ok(Some(Arc::new(OllamaGenerationClient::new(base_url)?)))
        }
    }
}

/// Generation client backed by a local Ollama runtime.
pub struct OllamaGenerationClient {
    http: Client,
    base_url: String,
}

impl OllamaGenerationClient {
    /// Construct a client for the Ollama runtime at `base_url`.
    pub fn new(base_url: String) -> Result<Self, GenerationClientError> {
        let http = Client::builder()
            .user_agent("rusty-corpus/generate")
            .build()
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl GenerationClient for OllamaGenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedText, GenerationClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "top_k": request.top_k,
                "top_p": request.top_p,
                "num_predict": request.max_tokens,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                GenerationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GenerationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            GenerationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(GenerationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(GeneratedText {
            text: body.response.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn client_for(server: &MockServer) -> OllamaGenerationClient {
        OllamaGenerationClient::new(server.base_url()).expect("client")
    }

    #[tokio::test]
    async fn ollama_client_forwards_sampling_options() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(
                        r#"{ "model": "llama3", "stream": false,
                             "options": { "top_k": 40, "num_predict": 2048 } }"#,
                    );
                then.status(200).json_body(json!({
                    "response": "  Plans start at $10.\n",
                    "done": true
                }));
            })
            .await;

        let generated = client_for(&server)
            .generate(GenerationRequest::knowledge_answer("llama3", "What do plans cost?"))
            .await
            .expect("generated");

        mock.assert();
        assert_eq!(generated.text, "Plans start at $10.");
    }

    #[tokio::test]
    async fn ollama_client_handles_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("model crashed");
            })
            .await;

        let error = client_for(&server)
            .generate(GenerationRequest::knowledge_answer("llama3", "prompt"))
            .await
            .expect_err("should fail");

        assert!(matches!(
            error,
            GenerationClientError::GenerationFailed(message) if message.contains("model crashed")
        ));
    }

    #[tokio::test]
    async fn ollama_client_rejects_incomplete_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({ "response": "partial", "done": false }));
            })
            .await;

        let error = client_for(&server)
            .generate(GenerationRequest::knowledge_answer("llama3", "prompt"))
            .await
            .expect_err("should fail");

        assert!(matches!(error, GenerationClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn missing_endpoint_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404);
            })
            .await;

        let error = client_for(&server)
            .generate(GenerationRequest::knowledge_answer("llama3", "prompt"))
            .await
            .expect_err("should fail");

        assert!(matches!(error, GenerationClientError::ProviderUnavailable(_)));
    }
}
