//! Configuration for the policy RAG pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Gemini configuration (used when `llm.backend = "gemini"`)
    pub gemini: GeminiConfig,
    /// Page compression configuration
    pub compression: CompressionConfig,
}

impl RagConfig {
    /// Parse a TOML configuration string. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: RagConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `POLICY_RAG_*` and API key environment variables on top of the file values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("POLICY_RAG_OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("POLICY_RAG_GENERATE_MODEL") {
            self.llm.generate_model = model.clone();
            self.gemini.model = model;
        }
        if let Ok(model) = std::env::var("POLICY_RAG_EMBED_MODEL") {
            self.llm.embed_model = model;
        }
        if let Ok(top_k) = std::env::var("POLICY_RAG_TOP_K") {
            match top_k.parse() {
                Ok(k) => self.retrieval.top_k = k,
                Err(_) => tracing::warn!("Ignoring invalid POLICY_RAG_TOP_K: {}", top_k),
            }
        }
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok();
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".to_string()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target passage size in characters
    pub chunk_size: usize,
    /// Overlap between neighbouring passages in characters
    pub chunk_overlap: usize,
    /// Length of the raw page snippet kept on each passage
    pub snippet_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            snippet_chars: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages retrieved per question
    pub top_k: usize,
    /// Maximum citation excerpt length in characters
    pub excerpt_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            excerpt_chars: 150,
        }
    }
}

/// Embedding backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama `/api/embeddings`
    #[default]
    Ollama,
    /// Local ONNX runtime (requires the `onnx` feature)
    Onnx,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which embedder to use
    pub backend: EmbeddingBackend,
    /// ONNX model name (sentence-transformers repository)
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text, 384 for MiniLM)
    pub dimensions: usize,
    /// Batch size for ONNX inference
    pub batch_size: usize,
    /// Maximum sequence length for ONNX inference
    pub max_length: usize,
    /// Number of concurrent embedding requests against Ollama
    pub parallel_requests: usize,
    /// Cache directory for downloaded models
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 768,
            batch_size: 32,
            max_length: 256,
            parallel_requests: 4,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("policy-rag")
                .join("models"),
        }
    }
}

/// Generator backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Google Gemini API
    Gemini,
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which generator answers questions
    pub backend: GeneratorBackend,
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed embedding requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.3, // Lower for more factual answers
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Google Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. Usually supplied through `GEMINI_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Output token limit
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.1,
            max_output_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

/// How page text is compressed before chunking
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// Pass text through unchanged
    None,
    /// Collapse redundant whitespace, keep paragraph breaks
    #[default]
    Whitespace,
    /// Ask the configured generator to condense each page
    Generative,
}

/// Page compression configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Compression strategy
    pub mode: CompressionMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.chunking.snippet_chars, 200);
        assert_eq!(config.retrieval.top_k, 10);
        assert_eq!(config.retrieval.excerpt_chars, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = RagConfig::from_toml_str(
            r#"
            [retrieval]
            top_k = 4

            [llm]
            backend = "gemini"

            [compression]
            mode = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.retrieval.excerpt_chars, 150);
        assert_eq!(config.llm.backend, GeneratorBackend::Gemini);
        assert_eq!(config.compression.mode, CompressionMode::None);
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let err = RagConfig::from_toml_str(
            r#"
            [chunking]
            chunk_size = 100
            chunk_overlap = 100
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = RagConfig::from_toml_str("retrieval = [").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
