// src/error.rs
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Run-ending failures. Anything in here propagates out of `runner::run`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Master store {path} is unreadable: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// Why one identifier was dropped. The batch keeps going.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("could not open a browser session: {0}")]
    Session(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("page did not render within {0:?}")]
    NotRendered(Duration),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl From<ScrapeError> for SkipReason {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::Navigation { reason, .. } => SkipReason::Navigation(reason),
            ScrapeError::Browser(msg) => SkipReason::Extraction(msg),
            other => SkipReason::Extraction(other.to_string()),
        }
    }
}

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Missing API key, bad base URL
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LlmError {
    /// Worth another attempt under the retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Network(_) | LlmError::Parse(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Config(_) => false,
        }
    }
}
