//! Recursive text chunking with page provenance
//!
//! Text is split on the coarsest separator present (paragraphs, then lines,
//! sentences, words and finally grapheme clusters). Pieces below the target
//! size are merged greedily, carrying a tail of up to `overlap` characters from
//! one passage into the next.

use std::collections::VecDeque;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::Passage;

/// Separators from coarsest to finest. The empty separator means graphemes.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Raw page characters kept on each passage
    snippet_chars: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
            snippet_chars: 200,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap).with_snippet_chars(config.snippet_chars)
    }

    /// Set the raw-text snippet length
    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    /// Target chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split one page into passages tagged with its page number
    pub fn chunk(&self, text: &str, page_number: u32, original_text: &str) -> Vec<Passage> {
        let snippet: String = original_text.chars().take(self.snippet_chars).collect();

        self.split_text(text)
            .into_iter()
            .map(|text| Passage {
                text,
                page_number,
                original_snippet: snippet.clone(),
            })
            .collect()
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).copied().unwrap_or("");
        let finer = separators.get(position + 1..).unwrap_or(&[]);

        let pieces: Vec<&str> = if separator.is_empty() {
            text.graphemes(true).collect()
        } else {
            text.split_inclusive(separator).collect()
        };

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge_pieces(&small));
                small.clear();
            }

            if finer.is_empty() {
                // A single grapheme longer than the target; keep it whole
                push_trimmed(&mut chunks, piece);
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge_pieces(&small));
        }

        chunks
    }

    /// Greedily merge pieces up to `chunk_size`, keeping an overlap window
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut chunks, &join(&window));

                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        push_trimmed(&mut chunks, &join(&window));
        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(500, 50)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join(window: &VecDeque<(&str, usize)>) -> String {
    window.iter().map(|(piece, _)| *piece).collect()
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{} ", i)).collect()
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("", 1, "").is_empty());
        assert!(chunker.chunk("  \n\n \t", 1, "  ").is_empty());
    }

    #[test]
    fn test_short_text_is_single_passage() {
        let chunker = TextChunker::default();
        let text = "Employees get 15 vacation days per year.";
        let passages = chunker.chunk(text, 3, text);

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, text);
        assert_eq!(passages[0].page_number, 3);
        assert_eq!(passages[0].original_snippet, text);
    }

    #[test]
    fn test_snippet_is_truncated() {
        let chunker = TextChunker::default();
        let original = "x".repeat(500);
        let passages = chunker.chunk("compressed", 1, &original);
        assert_eq!(passages[0].original_snippet.chars().count(), 200);
    }

    #[test]
    fn test_size_bound() {
        let chunker = TextChunker::new(100, 20);
        let text = format!(
            "{}\n\n{}\nA sentence. Another one. {}",
            words(40),
            words(25),
            "z".repeat(350)
        );

        let chunks = chunker.split_text(&text);
        assert!(chunks.len() > 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "too long: {}", chunk);
        }
    }

    #[test]
    fn test_unbroken_run_falls_back_to_characters() {
        let chunker = TextChunker::new(10, 2);
        let chunks = chunker.split_text(&"a".repeat(25));
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert!(total >= 25);
    }

    #[test]
    fn test_deterministic() {
        let chunker = TextChunker::new(120, 30);
        let text = format!("{}\n\n{}", words(60), words(33));
        assert_eq!(chunker.split_text(&text), chunker.split_text(&text));
    }

    #[test]
    fn test_coverage_and_overlap() {
        let chunker = TextChunker::new(100, 30);
        let text = words(80);
        let chunks = chunker.split_text(&text);

        // Every chunk is a contiguous slice of the input
        for chunk in &chunks {
            assert!(text.contains(chunk.as_str()));
        }

        // Every word survives somewhere
        for word in text.split_whitespace() {
            assert!(
                chunks.iter().any(|c| c.split_whitespace().any(|w| w == word)),
                "missing {}",
                word
            );
        }

        // Neighbours share their boundary words
        for pair in chunks.windows(2) {
            let first_word = pair[1].split_whitespace().next().unwrap();
            assert!(pair[0].split_whitespace().any(|w| w == first_word));
        }
    }

    #[test]
    fn test_paragraphs_preferred_over_words() {
        let chunker = TextChunker::new(60, 10);
        let first = "Leave policy applies to all full-time staff.";
        let second = "Remote work requires manager approval.";
        let chunks = chunker.split_text(&format!("{}\n\n{}", first, second));
        assert_eq!(chunks, vec![first.to_string(), second.to_string()]);
    }

    #[test]
    fn test_multibyte_text() {
        let chunker = TextChunker::new(8, 2);
        let text = "ünïcödé tëxt ñäïvé çäsé";
        let chunks = chunker.split_text(text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 8);
        }
    }
}
