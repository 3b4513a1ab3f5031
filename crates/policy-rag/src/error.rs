//! Error types for the policy RAG pipeline

use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// The source document could not be opened or parsed at all
    #[error("Failed to read document '{path}': {message}")]
    DocumentRead { path: String, message: String },

    /// Index build was given zero vectors
    #[error("Cannot build an index from zero vectors")]
    EmptyIndex,

    /// Search was called on an index that has not been built
    #[error("Vector index has not been built")]
    NotBuilt,

    /// A question was asked before any document finished loading
    #[error("No document is loaded")]
    NotLoaded,

    /// The generative model call failed or timed out
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Compression error
    #[error("Text compression failed: {0}")]
    Compression(String),

    /// Vector length does not match the index dimensionality
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a document read error
    pub fn document_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a compression error
    pub fn compression(message: impl Into<String>) -> Self {
        Self::Compression(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable label for the error kind, suitable for logs and front ends
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DocumentRead { .. } => "document_read",
            Error::EmptyIndex => "empty_index",
            Error::NotBuilt => "not_built",
            Error::NotLoaded => "not_loaded",
            Error::Generation(_) => "generation",
            Error::Embedding(_) => "embedding",
            Error::Compression(_) => "compression",
            Error::DimensionMismatch { .. } => "dimension_mismatch",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Toml(_) => "toml",
            Error::Http(_) => "http",
            Error::Internal(_) => "internal",
        }
    }

    /// Actionable message for the person using the assistant
    pub fn user_message(&self) -> String {
        match self {
            Error::DocumentRead { path, .. } => format!(
                "Could not read '{}'. Make sure it is a readable PDF or text file.",
                path
            ),
            Error::EmptyIndex => {
                "The document contains no extractable text, so there is nothing to search."
                    .to_string()
            }
            Error::NotBuilt | Error::NotLoaded => {
                "Please load a policy document before asking questions.".to_string()
            }
            Error::Generation(_) => {
                "The language model did not return an answer. Please try again.".to_string()
            }
            Error::Embedding(_) => {
                "The embedding service is unavailable. Check that it is running.".to_string()
            }
            Error::Config(msg) => format!("Invalid configuration: {}", msg),
            other => other.to_string(),
        }
    }
}
