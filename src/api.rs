//! HTTP surface for the summarization service.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Summarize raw text, windowing it into token-bounded chunks when it
//!   exceeds the configured budget. Returns the summary plus pipeline counters
//!   (`token_count`, `chunk_count`, `model_calls`).
//! - `POST /annotate` – Summarize every text document in a batch and return an annotation
//!   view aligning each summary with its source document.
//! - `GET /metadata` – Machine-readable service identity, model parameters, and endpoint
//!   catalog for quick discovery by tools/hosts.
//! - `GET /metrics` – Observe summarization counters.

use crate::config::get_config;
use crate::processing::{
    APP_IDENTITY, AnnotationView, DocumentInput, ProcessingError, SummarizeApi,
    chunking::determine_chunk_budget,
};
use crate::summarization::SummarizationClientError;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SummarizeApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/annotate", post(annotate_documents::<S>))
        .route("/metadata", get(get_metadata))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeRequest {
    /// Raw document contents to summarize.
    text: String,
}

/// Success response for the `POST /summarize` endpoint.
#[derive(Serialize)]
struct SummarizeResponse {
    /// Final abstract produced by the pipeline.
    summary: String,
    /// Number of tokens the input produced under the configured encoding.
    token_count: usize,
    /// Number of windows the input was cut into (1 for short inputs).
    chunk_count: usize,
    /// Number of model invocations spent on this document.
    model_calls: usize,
}

/// Summarize a raw text document.
///
/// Short inputs reach the model directly; longer inputs are windowed, summarized per
/// window, and reduced with one final pass over the joined partial summaries.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummarizeApi,
{
    let outcome = service.summarize_text(&request.text).await?;
    tracing::info!(
        tokens = outcome.token_count,
        chunks = outcome.chunk_count,
        model_calls = outcome.model_calls,
        "Summarize request completed"
    );
    Ok(Json(SummarizeResponse {
        summary: outcome.summary,
        token_count: outcome.token_count,
        chunk_count: outcome.chunk_count,
        model_calls: outcome.model_calls,
    }))
}

/// Request body for the `POST /annotate` endpoint.
#[derive(Deserialize)]
struct AnnotateRequest {
    /// Documents to scan for summarizable text.
    documents: Vec<DocumentInput>,
}

/// Summarize each text document in a batch and wrap the results in a view.
async fn annotate_documents<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AnnotateRequest>,
) -> Result<Json<AnnotationView>, AppError>
where
    S: SummarizeApi,
{
    let view = service.annotate(request.documents).await?;
    tracing::info!(
        view = %view.id,
        annotations = view.annotations.len(),
        "Annotate request completed"
    );
    Ok(Json(view))
}

/// Response body for `GET /metadata`.
#[derive(Serialize)]
struct MetadataResponse {
    /// Identity string stamped on every view this service produces.
    app: &'static str,
    /// Human-readable description of the service.
    description: &'static str,
    /// Model identifier requested from the inference backend.
    model: String,
    /// Tokenizer encoding used for chunk sizing.
    tokenizer_encoding: String,
    /// Maximum tokens per summarization window.
    chunk_budget: usize,
    /// Upper bound on generated summary length per model call.
    summary_max_length: usize,
    /// Configured lower bound on generated summary length.
    summary_min_length: usize,
    /// Endpoint catalog for discovery.
    endpoints: Vec<EndpointDescriptor>,
}

/// Descriptor for a single endpoint in the discovery catalog.
#[derive(Serialize)]
struct EndpointDescriptor {
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Describe the service identity, model parameters, and supported endpoints.
async fn get_metadata() -> Json<MetadataResponse> {
    let config = get_config();
    Json(MetadataResponse {
        app: APP_IDENTITY,
        description: env!("CARGO_PKG_DESCRIPTION"),
        model: config.summarizer_model.clone(),
        tokenizer_encoding: config.tokenizer_encoding.clone(),
        chunk_budget: determine_chunk_budget(config.max_chunk_tokens),
        summary_max_length: config.summary_max_length,
        summary_min_length: config.summary_min_length,
        endpoints: vec![
            EndpointDescriptor {
                method: "POST",
                path: "/summarize",
                description: "Summarize raw text, chunking inputs that exceed the token budget. Response returns { \"summary\": string, \"chunk_count\": number, \"model_calls\": number }.",
                request_example: Some(json!({
                    "text": "Document contents"
                })),
            },
            EndpointDescriptor {
                method: "POST",
                path: "/annotate",
                description: "Summarize every text document in a batch and return an annotation view aligning summaries with sources.",
                request_example: Some(json!({
                    "documents": [
                        { "id": "d1", "kind": "text", "text": "Document contents" }
                    ]
                })),
            },
            EndpointDescriptor {
                method: "GET",
                path: "/metadata",
                description: "Return service identity and model parameters.",
                request_example: None,
            },
            EndpointDescriptor {
                method: "GET",
                path: "/metrics",
                description: "Return summarization counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Return a concise metrics snapshot with document/chunk/model-call counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Result<Json<MetricsResponse>, AppError>
where
    S: SummarizeApi,
{
    let snapshot = service.metrics_snapshot();
    Ok(Json(MetricsResponse {
        documents_summarized: snapshot.documents_summarized,
        chunks_summarized: snapshot.chunks_summarized,
        model_calls: snapshot.model_calls,
    }))
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_summarized: u64,
    chunks_summarized: u64,
    model_calls: u64,
}

struct AppError(ProcessingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Backends report a loading model as retryable; surface that to callers.
            ProcessingError::Summarization(SummarizationClientError::ModelLoading(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::config::{CONFIG, Config};
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        AnnotationView, DocumentInput, DocumentKind, ProcessingError, SummarizeApi,
        SummaryAnnotation, SummaryOutcome,
    };
    use crate::summarization::SummarizationClientError;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::json;
    use std::sync::{Arc, Once};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn summarize_route_returns_summary_and_counters() {
        ensure_test_config();
        let outcome = SummaryOutcome {
            summary: "Condensed result.".into(),
            token_count: 42,
            chunk_count: 2,
            model_calls: 3,
        };
        let service = Arc::new(StubSummarizerService::new(outcome));
        let app = create_router(service.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "text": "Document body" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["summary"], "Condensed result.");
        assert_eq!(json["token_count"], 42);
        assert_eq!(json["chunk_count"], 2);
        assert_eq!(json["model_calls"], 3);

        let calls = service.recorded_texts().await;
        assert_eq!(calls, vec!["Document body".to_string()]);
    }

    #[tokio::test]
    async fn annotate_route_wraps_documents_in_a_view() {
        ensure_test_config();
        let outcome = SummaryOutcome {
            summary: "Condensed result.".into(),
            token_count: 10,
            chunk_count: 1,
            model_calls: 1,
        };
        let service = Arc::new(StubSummarizerService::new(outcome));
        let app = create_router(service);

        let payload = json!({
            "documents": [
                { "id": "d1", "text": "Document body" },
                { "id": "d2", "kind": "video", "text": "" }
            ]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/annotate")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["id"], "v_test");
        let annotations = json["annotations"].as_array().expect("annotations present");
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0]["source_id"], "d1");
        assert_eq!(annotations[0]["summary"], "Condensed result.");
    }

    #[tokio::test]
    async fn metadata_route_describes_the_service() {
        ensure_test_config();
        let service = Arc::new(StubSummarizerService::new(SummaryOutcome {
            summary: String::new(),
            token_count: 0,
            chunk_count: 0,
            model_calls: 0,
        }));
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/metadata")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["model"], "facebook/bart-large-cnn");
        assert_eq!(json["chunk_budget"], 512);
        let app_identity = json["app"].as_str().expect("app identity present");
        assert!(app_identity.starts_with("bartsum/"));

        // ensure catalog exposes every route for host discovery
        let endpoints = json["endpoints"].as_array().expect("endpoints present");
        assert!(endpoints.len() >= 4);
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        ensure_test_config();
        let service = Arc::new(StubSummarizerService::with_snapshot(MetricsSnapshot {
            documents_summarized: 7,
            chunks_summarized: 12,
            model_calls: 19,
        }));
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["documents_summarized"], 7);
        assert_eq!(json["chunks_summarized"], 12);
        assert_eq!(json["model_calls"], 19);
    }

    #[tokio::test]
    async fn processing_failures_surface_as_500() {
        ensure_test_config();
        let service = Arc::new(FailingService {
            error: || {
                ProcessingError::Summarization(SummarizationClientError::GenerationFailed(
                    "backend exploded".into(),
                ))
            },
        });
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "text": "Document body" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn loading_model_surfaces_as_503() {
        ensure_test_config();
        let service = Arc::new(FailingService {
            error: || {
                ProcessingError::Summarization(SummarizationClientError::ModelLoading(
                    "warming up".into(),
                ))
            },
        });
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "text": "Document body" }).to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[derive(Clone)]
    struct StubSummarizerService {
        texts: Arc<Mutex<Vec<String>>>,
        outcome: SummaryOutcome,
        snapshot: MetricsSnapshot,
    }

    impl StubSummarizerService {
        fn new(outcome: SummaryOutcome) -> Self {
            Self {
                texts: Arc::new(Mutex::new(Vec::new())),
                outcome,
                snapshot: MetricsSnapshot {
                    documents_summarized: 0,
                    chunks_summarized: 0,
                    model_calls: 0,
                },
            }
        }

        fn with_snapshot(snapshot: MetricsSnapshot) -> Self {
            let mut stub = Self::new(SummaryOutcome {
                summary: String::new(),
                token_count: 0,
                chunk_count: 0,
                model_calls: 0,
            });
            stub.snapshot = snapshot;
            stub
        }

        async fn recorded_texts(&self) -> Vec<String> {
            self.texts.lock().await.clone()
        }
    }

    #[async_trait]
    impl SummarizeApi for StubSummarizerService {
        async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, ProcessingError> {
            self.texts.lock().await.push(text.to_string());
            Ok(self.outcome.clone())
        }

        async fn annotate(
            &self,
            documents: Vec<DocumentInput>,
        ) -> Result<AnnotationView, ProcessingError> {
            let annotations = documents
                .iter()
                .filter(|document| document.kind == DocumentKind::Text)
                .map(|document| SummaryAnnotation {
                    id: "a_test".into(),
                    source_id: document.id.clone().unwrap_or_default(),
                    summary: self.outcome.summary.clone(),
                    chunk_count: self.outcome.chunk_count,
                })
                .collect();
            Ok(AnnotationView {
                id: "v_test".into(),
                app: "bartsum/v0.0.0".into(),
                model: "facebook/bart-large-cnn".into(),
                timestamp: "2025-01-01T00:00:00Z".into(),
                annotations,
            })
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            self.snapshot
        }
    }

    struct FailingService {
        error: fn() -> ProcessingError,
    }

    #[async_trait]
    impl SummarizeApi for FailingService {
        async fn summarize_text(&self, _text: &str) -> Result<SummaryOutcome, ProcessingError> {
            Err((self.error)())
        }

        async fn annotate(
            &self,
            _documents: Vec<DocumentInput>,
        ) -> Result<AnnotationView, ProcessingError> {
            Err((self.error)())
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_summarized: 0,
                chunks_summarized: 0,
                model_calls: 0,
            }
        }
    }

    fn ensure_test_config() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = CONFIG.set(Config {
                summarizer_url: "http://127.0.0.1:9090".into(),
                summarizer_model: "facebook/bart-large-cnn".into(),
                summarizer_api_token: None,
                tokenizer_encoding: "whitespace".into(),
                max_chunk_tokens: None,
                summary_max_length: 150,
                summary_min_length: 30,
                server_port: None,
            });
        });
    }
}
