//! Helpers for assembling annotation views over summarized documents.

use time::OffsetDateTime;
use uuid::Uuid;

use super::types::{AnnotationView, DocumentInput, DocumentKind, SummaryAnnotation};

/// Identity string recorded on every view this service produces.
pub(crate) const APP_IDENTITY: &str =
    concat!(env!("CARGO_PKG_NAME"), "/v", env!("CARGO_PKG_VERSION"));

/// Pick the documents eligible for summarization and pair each with a stable identifier.
///
/// Only text documents are summarized; audio, video, and image entries pass through
/// untouched. Documents without an identifier get a generated one so annotations can still
/// point back at their source.
pub(crate) fn select_text_documents(documents: &[DocumentInput]) -> Vec<(String, &str)> {
    let selected: Vec<(String, &str)> = documents
        .iter()
        .filter(|document| document.kind == DocumentKind::Text)
        .map(|document| {
            let id = document
                .id
                .as_ref()
                .filter(|id| !id.trim().is_empty())
                .cloned()
                .unwrap_or_else(generate_document_id);
            (id, document.text.as_str())
        })
        .collect();

    let skipped = documents.len() - selected.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped non-text documents");
    }
    if selected.is_empty() {
        tracing::warn!(
            total = documents.len(),
            "No text documents found; producing an empty view"
        );
    }

    selected
}

/// Assemble the view wrapping a batch of summary annotations.
pub(crate) fn build_view(annotations: Vec<SummaryAnnotation>, model: &str) -> AnnotationView {
    AnnotationView {
        id: generate_view_id(),
        app: APP_IDENTITY.to_string(),
        model: model.to_string(),
        timestamp: current_timestamp_rfc3339(),
        annotations,
    }
}

/// Construct one summary annotation aligned with its source document.
pub(crate) fn new_annotation(
    source_id: String,
    summary: String,
    chunk_count: usize,
) -> SummaryAnnotation {
    SummaryAnnotation {
        id: generate_annotation_id(),
        source_id,
        summary,
        chunk_count,
    }
}

/// Current timestamp formatted for view metadata.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn generate_document_id() -> String {
    format!("d_{}", Uuid::new_v4())
}

fn generate_view_id() -> String {
    format!("v_{}", Uuid::new_v4())
}

fn generate_annotation_id() -> String {
    format!("a_{}", Uuid::new_v4())
}
