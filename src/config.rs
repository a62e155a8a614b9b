use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Summarization model requested when `SUMMARIZER_MODEL` is not set.
pub const DEFAULT_SUMMARIZER_MODEL: &str = "facebook/bart-large-cnn";

/// Tokenizer encoding assumed when `TOKENIZER_ENCODING` is not set.
///
/// BART's vocabulary is the GPT-2 byte-level BPE, so the `gpt2` encoding gives token counts
/// close to what the model itself will see.
pub const DEFAULT_TOKENIZER_ENCODING: &str = "gpt2";

const DEFAULT_SUMMARY_MAX_LENGTH: usize = 150;
const DEFAULT_SUMMARY_MIN_LENGTH: usize = 30;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization service.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the inference backend hosting the summarization model.
    pub summarizer_url: String,
    /// Model identifier passed to the backend.
    pub summarizer_model: String,
    /// Optional bearer token forwarded to the backend.
    pub summarizer_api_token: Option<String>,
    /// Tokenizer encoding used for token counting and windowing.
    pub tokenizer_encoding: String,
    /// Optional override for the per-chunk token budget.
    pub max_chunk_tokens: Option<usize>,
    /// Maximum token length requested for each generated summary.
    pub summary_max_length: usize,
    /// Minimum token length requested for each generated summary.
    pub summary_min_length: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            summarizer_url: load_env("SUMMARIZER_URL")?,
            summarizer_model: load_env_optional("SUMMARIZER_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
            summarizer_api_token: load_env_optional("SUMMARIZER_API_TOKEN"),
            tokenizer_encoding: load_env_optional("TOKENIZER_ENCODING")
                .unwrap_or_else(|| DEFAULT_TOKENIZER_ENCODING.to_string()),
            max_chunk_tokens: parse_optional("MAX_CHUNK_TOKENS")?,
            summary_max_length: parse_optional("SUMMARY_MAX_LENGTH")?
                .unwrap_or(DEFAULT_SUMMARY_MAX_LENGTH),
            summary_min_length: parse_optional("SUMMARY_MIN_LENGTH")?
                .unwrap_or(DEFAULT_SUMMARY_MIN_LENGTH),
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        summarizer_url = %config.summarizer_url,
        model = %config.summarizer_model,
        tokenizer_encoding = %config.tokenizer_encoding,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
