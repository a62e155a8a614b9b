#![deny(missing_docs)]

//! Core library for the chunked BART summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization metrics helpers.
pub mod metrics;
/// Document summarization pipeline utilities.
pub mod processing;
/// Summarization client abstraction and adapters.
pub mod summarization;
