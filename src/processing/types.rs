//! Core data types and error definitions for the summarization pipeline.

use anyhow::Error as TokenizerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while turning raw text into token windows.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// The pipeline was configured with an impossible token budget.
    #[error("chunk budget must be greater than zero")]
    InvalidChunkBudget,
    /// Tokenizer resources were unavailable for the configured encoding.
    #[error("failed to initialize tokenizer for encoding '{encoding}': {source}")]
    Tokenizer {
        /// Encoding or model name we attempted to load.
        encoding: String,
        /// Underlying error raised by the tokenizer library.
        #[source]
        source: TokenizerError,
    },
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Chunking step failed to window the document.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Backend failed to produce a summary for a chunk.
    #[error("Failed to generate summary: {0}")]
    Summarization(#[from] crate::summarization::SummarizationClientError),
}

/// Result of a completed summarization produced by
/// [`crate::processing::SummarizerService::summarize_text`].
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Final summary text; empty when the input tokenized to nothing.
    pub summary: String,
    /// Number of tokens counted in the input.
    pub token_count: usize,
    /// Number of windows summarized (1 when the input fit the budget, 0 for empty input).
    pub chunk_count: usize,
    /// Number of calls issued to the summarization backend.
    pub model_calls: usize,
}

/// Kinds of documents accepted by the annotation surface.
///
/// Only text documents are summarized; the others exist so mixed-media requests can be
/// handled without erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Plain text content, eligible for summarization.
    #[default]
    Text,
    /// Audio media reference; skipped.
    Audio,
    /// Video media reference; skipped.
    Video,
    /// Image media reference; skipped.
    Image,
}

/// A document submitted to the annotation surface.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    /// Optional caller-assigned identifier; generated when absent so alignments stay valid.
    #[serde(default)]
    pub id: Option<String>,
    /// Document kind used for eligibility lookup (defaults to `text`).
    #[serde(default)]
    pub kind: DocumentKind,
    /// Document contents.
    pub text: String,
}

/// A summary aligned to the document it was generated from.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryAnnotation {
    /// Identifier assigned to this annotation.
    pub id: String,
    /// Identifier of the source document.
    pub source_id: String,
    /// Generated summary text.
    pub summary: String,
    /// Number of windows the source document was split into.
    pub chunk_count: usize,
}

/// Output of one annotate call: the annotations plus the identity of their producer.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationView {
    /// Identifier assigned to this view.
    pub id: String,
    /// Application name and version that produced the view.
    pub app: String,
    /// Model identifier the summaries were generated with.
    pub model: String,
    /// RFC3339 timestamp recorded when the view was assembled.
    pub timestamp: String,
    /// One annotation per summarized document.
    pub annotations: Vec<SummaryAnnotation>,
}
