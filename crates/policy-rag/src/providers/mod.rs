//! Provider abstractions for embeddings, generation, and page compression
//!
//! This module provides trait-based abstractions that allow switching between
//! a local Ollama server, the Gemini API, and in-process ONNX embeddings.

pub mod compression;
pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod ollama;

#[cfg(feature = "onnx")]
pub mod onnx;

use std::sync::Arc;

use crate::config::{CompressionMode, EmbeddingBackend, GeneratorBackend, RagConfig};
use crate::error::{Error, Result};

pub use compression::{Compressor, GenerativeCompressor, IdentityCompressor, WhitespaceCompressor};
pub use embedding::Embedder;
pub use gemini::GeminiGenerator;
pub use llm::Generator;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaGenerator};

#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

/// Create the embedder selected by `embeddings.backend`
pub async fn build_embedder(config: &RagConfig) -> Result<Arc<dyn Embedder>> {
    match config.embeddings.backend {
        EmbeddingBackend::Ollama => {
            tracing::info!(
                "Using Ollama embeddings: {} at {}",
                config.llm.embed_model,
                config.llm.base_url
            );
            Ok(Arc::new(OllamaEmbedder::new(
                &config.llm,
                config.embeddings.dimensions,
                config.embeddings.parallel_requests,
            )?))
        }
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => Ok(Arc::new(OnnxEmbedder::new(&config.embeddings).await?)),
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => Err(Error::Config(
            "ONNX embeddings require building with the `onnx` feature".to_string(),
        )),
    }
}

/// Create the generator selected by `llm.backend`
pub fn build_generator(config: &RagConfig) -> Result<Arc<dyn Generator>> {
    match config.llm.backend {
        GeneratorBackend::Ollama => {
            tracing::info!(
                "Using Ollama generation: {} at {}",
                config.llm.generate_model,
                config.llm.base_url
            );
            Ok(Arc::new(OllamaGenerator::new(&config.llm)?))
        }
        GeneratorBackend::Gemini => {
            tracing::info!("Using Gemini generation: {}", config.gemini.model);
            Ok(Arc::new(GeminiGenerator::new(&config.gemini)?))
        }
    }
}

/// Create the page compressor selected by `compression.mode`.
/// Generative compression reuses the answer generator.
pub fn build_compressor(config: &RagConfig, generator: Arc<dyn Generator>) -> Arc<dyn Compressor> {
    match config.compression.mode {
        CompressionMode::None => Arc::new(IdentityCompressor),
        CompressionMode::Whitespace => Arc::new(WhitespaceCompressor),
        CompressionMode::Generative => Arc::new(GenerativeCompressor::new(generator)),
    }
}
