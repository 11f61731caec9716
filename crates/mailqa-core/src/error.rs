//! Error types for the mailqa pipeline.
//!
//! Errors are organized by step (ingest, select, generate) so a shell can
//! tell the user exactly which step failed and what to correct before
//! retrying it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for mailqa operations.
#[derive(Error, Debug)]
pub enum MailQaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dataset ingestion errors
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Row selection errors
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A provider call failed outside of a batch
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A provider call failed for one row and aborted the batch
    #[error("Answering row {row} failed: {source}")]
    Batch {
        row: usize,
        #[source]
        source: ProviderError,
    },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while turning an uploaded file into a dataset.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file could not be opened or parsed
    #[error("Error reading {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    /// The required text column is absent
    #[error("The uploaded file must contain a column named '{column}' (found: {})", found.join(", "))]
    Schema { column: String, found: Vec<String> },

    /// The file extension is not a delimited or spreadsheet format
    #[error("Unsupported file type for {path}: '{extension}' (expected csv, tsv, xlsx, xls, xlsb or ods)")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Errors raised while choosing which rows to process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Range or manual parameters reference out-of-bounds or malformed indices
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Nothing selected to answer questions about
    #[error("No emails selected. Go back and select at least one email.")]
    NoSelection,

    /// No dataset has been loaded yet
    #[error("No email data loaded. Upload a file first.")]
    NoDataLoaded,
}

/// A failed call to the LLM provider.
///
/// Network, authentication, quota and malformed-response failures all
/// collapse into this one type; `status_code` is set when the provider
/// answered with a non-success HTTP status.
#[derive(Error, Debug, Clone)]
#[error("{provider} error: {message}")]
pub struct ProviderError {
    pub provider: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl ProviderError {
    pub fn new(provider: &str, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(provider: &str, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

/// Convenience type alias for mailqa results.
pub type Result<T> = std::result::Result<T, MailQaError>;
