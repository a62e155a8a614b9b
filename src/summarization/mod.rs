//! Abstractions for generating abstractive summaries via a hosted inference backend.
//!
//! The processing layer never speaks HTTP itself; it calls through the
//! [`SummarizationClient`] trait so tests can substitute recording stubs. The default
//! implementation posts to a Hugging Face style inference endpoint and mirrors the
//! raw-reqwest shape used elsewhere in the service.

use crate::config::get_config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Backend was unreachable or the model endpoint does not exist.
    #[error("Summarization backend unavailable: {0}")]
    BackendUnavailable(String),
    /// Backend accepted the request but the model is still being loaded.
    #[error("Summarization model is still loading: {0}")]
    ModelLoading(String),
    /// Backend returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed backend response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization backend for a single chunk.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Text the model should condense.
    pub text: String,
    /// Upper bound on generated summary length, in model tokens.
    pub max_length: usize,
    /// Lower bound on generated summary length, in model tokens.
    pub min_length: usize,
}

/// Interface implemented by abstractive summarization backends.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary for one chunk of input text.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client from configuration.
pub fn build_summarization_client() -> Box<dyn SummarizationClient + Send + Sync> {
    let config = get_config();
    Box::new(HfInferenceClient::new(
        config.summarizer_url.clone(),
        config.summarizer_model.clone(),
        config.summarizer_api_token.clone(),
    ))
}

struct HfInferenceClient {
    http: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HfInferenceClient {
    fn new(base_url: String, model: String, api_token: Option<String>) -> Self {
        let http = Client::builder()
            .user_agent("bartsum/summary")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            base_url,
            model,
            api_token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct InferenceSummary {
    summary_text: String,
}

#[async_trait]
impl SummarizationClient for HfInferenceClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": request.max_length,
                "min_length": request.min_length,
                // Sampling disabled so repeated runs over the same document agree.
                "do_sample": false,
            }
        });

        let mut builder = self.http.post(self.endpoint()).json(&payload);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            SummarizationClientError::BackendUnavailable(format!(
                "failed to reach inference backend at {}: {error}",
                self.base_url
            ))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::BackendUnavailable(format!(
                "model endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::ModelLoading(format!(
                "model '{}' is not ready yet: {body}",
                self.model
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "inference backend returned {status}: {body}"
            )));
        }

        let body: Vec<InferenceSummary> = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode inference response: {error}"
            ))
        })?;

        let first = body.into_iter().next().ok_or_else(|| {
            SummarizationClientError::InvalidResponse(
                "inference response contained no summaries".into(),
            )
        })?;

        Ok(first.summary_text)
    }
}
