//! Summarization service coordinating token windowing, model calls, and view assembly.

use crate::{
    config::get_config,
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        annotate::{build_view, new_annotation, select_text_documents},
        chunking::{ChunkTokenizer, build_chunk_tokenizer, determine_chunk_budget},
        types::{AnnotationView, DocumentInput, ProcessingError, SummaryOutcome},
    },
    summarization::{SummarizationClient, SummarizationRequest, build_summarization_client},
};
use async_trait::async_trait;

/// Coordinates the full summarization pipeline: token windowing, per-chunk model calls, and
/// the final reduction pass over joined partial summaries.
///
/// The service owns the inference client, the chunk tokenizer, and the metrics registry so
/// the HTTP surface reuses the same components across requests. Construct the service once
/// near process start and share it through an `Arc`.
pub struct SummarizerService {
    client: Box<dyn SummarizationClient + Send + Sync>,
    tokenizer: ChunkTokenizer,
    chunk_budget: usize,
    summary_max_length: usize,
    summary_min_length: usize,
    model: String,
    metrics: SummaryMetrics,
}

/// Abstraction over the summarization pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Summarize one text, windowing it when it exceeds the chunk budget.
    async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, ProcessingError>;

    /// Summarize every text document in a batch and wrap the results in a view.
    async fn annotate(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<AnnotationView, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummarizerService {
    /// Build the service from process configuration.
    pub fn new() -> Self {
        let config = get_config();
        let tokenizer = build_chunk_tokenizer(&config.tokenizer_encoding)
            .expect("Failed to initialize chunk tokenizer");
        let chunk_budget = determine_chunk_budget(config.max_chunk_tokens);
        tracing::info!(
            model = %config.summarizer_model,
            encoding = %config.tokenizer_encoding,
            chunk_budget,
            "Summarizer service initialized"
        );

        Self {
            client: build_summarization_client(),
            tokenizer,
            chunk_budget,
            summary_max_length: config.summary_max_length,
            summary_min_length: config.summary_min_length,
            model: config.summarizer_model.clone(),
            metrics: SummaryMetrics::new(),
        }
    }

    /// Summarize one text, windowing it into token-bounded chunks when needed.
    ///
    /// Short inputs go straight to the model. Longer inputs are cut into consecutive
    /// windows of at most the chunk budget, each window is summarized independently, and a
    /// single reduction pass condenses the joined partial summaries into the final result.
    pub async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, ProcessingError> {
        let token_count = self.tokenizer.token_count(text);
        if token_count == 0 {
            tracing::debug!("Input tokenized to nothing; skipping model calls");
            self.metrics.record_document(0, 0);
            return Ok(SummaryOutcome {
                summary: String::new(),
                token_count,
                chunk_count: 0,
                model_calls: 0,
            });
        }

        if token_count <= self.chunk_budget {
            let summary = self.summarize_chunk(text.to_string()).await?;
            self.metrics.record_document(1, 1);
            tracing::info!(
                tokens = token_count,
                chunks = 1,
                model_calls = 1,
                "Document summarized"
            );
            return Ok(SummaryOutcome {
                summary,
                token_count,
                chunk_count: 1,
                model_calls: 1,
            });
        }

        let chunks = self.tokenizer.chunk_text(text, self.chunk_budget)?;
        let chunk_count = chunks.len();
        tracing::debug!(
            tokens = token_count,
            chunks = chunk_count,
            budget = self.chunk_budget,
            "Windowed document for summarization"
        );

        let mut chunk_summaries = Vec::with_capacity(chunk_count);
        for chunk in chunks {
            chunk_summaries.push(self.summarize_chunk(chunk).await?);
        }

        // One reduction pass over the joined partial summaries. The joined text is never
        // re-windowed, however long it turns out to be.
        let summary = self.summarize_chunk(chunk_summaries.join(" ")).await?;
        let model_calls = chunk_count + 1;

        self.metrics
            .record_document(chunk_count as u64, model_calls as u64);
        tracing::info!(
            tokens = token_count,
            chunks = chunk_count,
            model_calls,
            "Document summarized"
        );

        Ok(SummaryOutcome {
            summary,
            token_count,
            chunk_count,
            model_calls,
        })
    }

    /// Summarize every text document in the batch and assemble the annotation view.
    pub async fn annotate(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<AnnotationView, ProcessingError> {
        let selected = select_text_documents(&documents);
        let mut annotations = Vec::with_capacity(selected.len());
        for (source_id, text) in selected {
            let outcome = self.summarize_text(text).await?;
            annotations.push(new_annotation(source_id, outcome.summary, outcome.chunk_count));
        }

        let view = build_view(annotations, &self.model);
        tracing::info!(
            view = %view.id,
            documents = documents.len(),
            annotated = view.annotations.len(),
            "Annotation view created"
        );
        Ok(view)
    }

    /// Return the current summarization metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn summarize_chunk(&self, text: String) -> Result<String, ProcessingError> {
        let max_length = self.summary_max_length;
        let min_length = effective_min_length(max_length, self.summary_min_length);
        let summary = self
            .client
            .generate_summary(SummarizationRequest {
                text,
                max_length,
                min_length,
            })
            .await?;
        Ok(summary)
    }
}

impl Default for SummarizerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummarizeApi for SummarizerService {
    async fn summarize_text(&self, text: &str) -> Result<SummaryOutcome, ProcessingError> {
        SummarizerService::summarize_text(self, text).await
    }

    async fn annotate(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<AnnotationView, ProcessingError> {
        SummarizerService::annotate(self, documents).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummarizerService::metrics_snapshot(self)
    }
}

/// Derive the minimum generation length for one model call.
///
/// The configured minimum applies while it stays below the maximum; for smaller maximums
/// the model is asked for at least half the budget instead.
fn effective_min_length(max_length: usize, configured_min: usize) -> usize {
    if max_length > configured_min {
        configured_min
    } else {
        max_length / 2
    }
}
