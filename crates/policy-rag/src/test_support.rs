//! Deterministic fakes for the embedding and generation seams

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::providers::{Embedder, Generator};

/// Bag-of-words embedder using FNV-1a feature hashing, L2-normalised
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new() -> Self {
        Self { dimensions: 256 }
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in words(text) {
            vector[(fnv1a(&word) % self.dimensions as u64) as usize] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

/// Answers with the context block sharing the most words with the question,
/// quoting its page the way a grounded model would
pub struct ExtractiveGenerator;

#[async_trait]
impl Generator for ExtractiveGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let context = prompt
            .split_once("POLICY TEXT:")
            .and_then(|(_, rest)| rest.split_once("QUESTION:"))
            .map(|(context, _)| context)
            .ok_or_else(|| Error::generation("Prompt has no policy text"))?;
        let question: HashSet<String> = prompt
            .rsplit_once("QUESTION:")
            .map(|(_, q)| words(q).into_iter().collect())
            .unwrap_or_default();

        let best = context
            .split("[Page ")
            .filter_map(|block| {
                let (number, text) = block.split_once(']')?;
                let number: u32 = number.trim().parse().ok()?;
                let overlap = words(text).iter().filter(|w| question.contains(*w)).count();
                Some((overlap, number, text.trim().to_string()))
            })
            // Highest overlap wins; earlier (better ranked) blocks win ties
            .fold(None, |best: Option<(usize, u32, String)>, candidate| match best {
                Some(current) if current.0 >= candidate.0 => Some(current),
                _ => Some(candidate),
            });

        Ok(match best {
            Some((_, page, text)) => format!("According to page {}, {}", page, text),
            None => "The policy does not mention this.".to_string(),
        })
    }

    fn name(&self) -> &str {
        "extractive"
    }

    fn model(&self) -> &str {
        "extractive"
    }
}

/// Always fails with a generation error
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("model unavailable"))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "none"
    }
}

/// Returns a fixed reply and records every prompt it receives
pub struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording"
    }
}
