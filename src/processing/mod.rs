//! Document summarization pipeline: token windowing, model calls, and view assembly.

mod annotate;
pub mod chunking;
mod service;
pub mod types;

pub(crate) use annotate::APP_IDENTITY;
pub use service::{SummarizeApi, SummarizerService};
pub use types::{
    AnnotationView, ChunkingError, DocumentInput, DocumentKind, ProcessingError,
    SummaryAnnotation, SummaryOutcome,
};
