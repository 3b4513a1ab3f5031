//! Query-time result types: citations, retrieved context and answers

use serde::{Deserialize, Serialize};

use crate::generation::citation::referenced_pages;

/// Citation of one retrieved passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Page the passage came from
    pub page_number: u32,
    /// Passage text, truncated for display
    pub excerpt: String,
    /// Retrieval rank (0 = nearest)
    pub rank: usize,
    /// L2 distance between query and passage vectors
    pub distance: f32,
}

impl Citation {
    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        format!("[Page {}] {}", self.page_number, self.excerpt)
    }
}

/// Context assembled from the nearest passages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedContext {
    /// Passages prefixed with page markers, in rank order
    pub context: String,
    /// One citation per retrieved passage, in rank order
    pub citations: Vec<Citation>,
    /// Sorted, de-duplicated page numbers across all hits
    pub relevant_pages: Vec<u32>,
}

/// Answer to a question about the loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Generated answer, verbatim from the model
    pub answer: String,
    /// Citations in retrieval-rank order
    pub citations: Vec<Citation>,
    /// Sorted, de-duplicated page numbers cited
    pub relevant_pages: Vec<u32>,
}

impl AnswerResult {
    /// Page numbers the model mentioned in its answer
    pub fn referenced_pages(&self) -> Vec<u32> {
        referenced_pages(&self.answer)
    }

    /// Render the citations as one line per source
    pub fn format_sources(&self) -> String {
        self.citations
            .iter()
            .map(Citation::format_inline)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
