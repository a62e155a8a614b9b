//! Tracing configuration and log routing.
//!
//! Logs go to stdout with a compact formatter and, when a writable location exists, to a file
//! as well. `BARTSUM_LOG_FILE` selects the file target; without it logs land in
//! `logs/bartsum.log`. The file layer uses a non-blocking writer so request handling never
//! waits on disk.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Keeps the non-blocking writer alive for the process lifetime via a global guard.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match configure_file_writer() {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

/// Build a non-blocking writer for file logging.
///
/// Returns `None` when the target file (or its parent directory) cannot be prepared; the
/// service then logs to stdout only.
fn configure_file_writer() -> Option<NonBlocking> {
    let target = std::env::var("BARTSUM_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new("logs").join("bartsum.log"));

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                eprintln!("Failed to create log directory {}: {err}", parent.display());
                return None;
            }
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&target)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", target.display());
            None
        }
    }
}
