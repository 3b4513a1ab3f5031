//! Page compression applied before chunking

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::llm::Generator;

/// Reduces the token count of page text while keeping its meaning
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Compress one page of text
    async fn compress(&self, text: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Leaves text untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCompressor;

#[async_trait]
impl Compressor for IdentityCompressor {
    async fn compress(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Collapses runs of horizontal whitespace and blank lines.
/// Paragraph breaks survive as a single blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCompressor;

impl WhitespaceCompressor {
    /// Synchronous form of [`Compressor::compress`]
    pub fn squeeze(text: &str) -> String {
        static HORIZONTAL: OnceLock<Regex> = OnceLock::new();
        static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();

        let horizontal = HORIZONTAL.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid regex"));
        let blank_runs = BLANK_RUNS.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"));

        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<String> = normalized
            .lines()
            .map(|line| horizontal.replace_all(line, " ").trim().to_string())
            .collect();

        blank_runs
            .replace_all(&lines.join("\n"), "\n\n")
            .trim()
            .to_string()
    }
}

#[async_trait]
impl Compressor for WhitespaceCompressor {
    async fn compress(&self, text: &str) -> Result<String> {
        Ok(Self::squeeze(text))
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}

/// Asks a generative model to condense each page
pub struct GenerativeCompressor {
    generator: Arc<dyn Generator>,
}

impl GenerativeCompressor {
    /// Create a compressor backed by `generator`
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Compressor for GenerativeCompressor {
    async fn compress(&self, text: &str) -> Result<String> {
        let prompt = PromptBuilder::build_compression_prompt(text);
        let compressed = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| Error::compression(e.to_string()))?;

        // An empty completion would silently drop the page
        if compressed.trim().is_empty() {
            tracing::warn!(
                "{} returned an empty compression, keeping normalised text",
                self.generator.name()
            );
            return Ok(WhitespaceCompressor::squeeze(text));
        }

        Ok(compressed.trim().to_string())
    }

    fn name(&self) -> &str {
        "generative"
    }
}
