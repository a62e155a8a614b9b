//! Tokenizer resolution and fixed-size token windowing.
//!
//! Long documents are split on exact token boundaries before summarization: the token
//! sequence is cut into consecutive windows of at most the configured budget, and each
//! window is decoded back into text for the backend. Boundaries fall on multiples of the
//! budget, so the windowing for a given token length is fully deterministic.
//!
//! Tokenization prefers `tiktoken-rs` encodings; a whitespace tokenizer is available as a
//! degraded mode and for deterministic tests.

use anyhow::Error as TokenizerError;
use tiktoken_rs::{
    CoreBPE, cl100k_base, get_bpe_from_model, o200k_base, p50k_base, p50k_edit, r50k_base,
};

use super::types::ChunkingError;

/// Token budget applied when no override is configured.
///
/// BART accepts up to 1024 positions, but generation degrades near the limit; 512 keeps
/// every window comfortably inside the model's context.
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 512;

/// Encoding name selecting the whitespace tokenizer.
pub const WHITESPACE_ENCODING: &str = "whitespace";

/// Resolve the per-chunk token budget, respecting an explicit override.
///
/// Overrides are clamped at `>= 1`; without one the default budget applies.
pub fn determine_chunk_budget(override_size: Option<usize>) -> usize {
    match override_size {
        Some(explicit) => explicit.max(1),
        None => DEFAULT_MAX_CHUNK_TOKENS,
    }
}

/// Tokenizer used to measure text and cut it into decodable token windows.
pub enum ChunkTokenizer {
    /// Byte-pair encoding backed by `tiktoken`.
    Bpe(CoreBPE),
    /// Whitespace-separated words; deterministic and dependency-free.
    Whitespace,
}

impl ChunkTokenizer {
    /// Count the tokens the encoding produces for `text`.
    pub fn token_count(&self, text: &str) -> usize {
        match self {
            Self::Bpe(encoding) => encoding.encode_ordinary(text).len(),
            Self::Whitespace => text.split_whitespace().count(),
        }
    }

    /// Split `text` into consecutive windows of at most `budget` tokens, decoding each
    /// window back to text. The last window may be shorter; empty input yields no windows.
    pub fn chunk_text(&self, text: &str, budget: usize) -> Result<Vec<String>, ChunkingError> {
        if budget == 0 {
            return Err(ChunkingError::InvalidChunkBudget);
        }

        match self {
            Self::Bpe(encoding) => {
                let tokens = encoding.encode_ordinary(text);
                Ok(tokens
                    .chunks(budget)
                    .map(|window| {
                        // A boundary can land between the tokens of one multi-byte
                        // character; decode the raw bytes and replace the torn edges
                        // rather than failing the whole document.
                        let bytes: Vec<u8> = encoding
                            ._decode_native_and_split(window.to_vec())
                            .flatten()
                            .collect();
                        String::from_utf8_lossy(&bytes).into_owned()
                    })
                    .collect())
            }
            Self::Whitespace => {
                let words: Vec<&str> = text.split_whitespace().collect();
                Ok(words
                    .chunks(budget)
                    .map(|window| window.join(" "))
                    .collect())
            }
        }
    }
}

/// Build the tokenizer for the configured encoding name.
///
/// `whitespace` (or an empty value) selects the degraded word tokenizer; anything else goes
/// through the `tiktoken` resolution chain.
pub fn build_chunk_tokenizer(encoding: &str) -> Result<ChunkTokenizer, ChunkingError> {
    let normalized = encoding.trim();
    if normalized.is_empty() || normalized.eq_ignore_ascii_case(WHITESPACE_ENCODING) {
        return Ok(ChunkTokenizer::Whitespace);
    }

    let bpe = resolve_encoding(normalized).map_err(|source| ChunkingError::Tokenizer {
        encoding: normalized.to_string(),
        source,
    })?;
    Ok(ChunkTokenizer::Bpe(bpe))
}

fn resolve_encoding(name: &str) -> Result<CoreBPE, TokenizerError> {
    match get_bpe_from_model(name) {
        Ok(encoding) => Ok(encoding),
        Err(model_err) => {
            tracing::debug!(
                encoding = name,
                error = %model_err,
                "Tokenizer model lookup failed; trying encoding name"
            );
            if let Some(candidate) = encoding_from_name(name) {
                candidate
            } else {
                tracing::warn!(
                    encoding = name,
                    "Falling back to 'cl100k_base' encoding for token windows"
                );
                cl100k_base()
            }
        }
    }
}

fn encoding_from_name(name: &str) -> Option<Result<CoreBPE, TokenizerError>> {
    match name {
        "cl100k_base" => Some(cl100k_base()),
        "o200k_base" => Some(o200k_base()),
        "p50k_base" => Some(p50k_base()),
        "p50k_edit" => Some(p50k_edit()),
        "r50k_base" | "gpt2" => Some(r50k_base()),
        _ => None,
    }
}
