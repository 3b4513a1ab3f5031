//! Ingestion pipeline orchestration: extract, compress, chunk

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::Compressor;
use crate::types::{Document, Passage};

use super::chunker::TextChunker;
use super::parser::Extractor;

/// Turns a document on disk into ordered, page-tagged passages
pub struct IngestPipeline {
    /// Page text extractor
    extractor: Extractor,
    /// Page compressor, applied before chunking
    compressor: Arc<dyn Compressor>,
    /// Text chunker
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(compressor: Arc<dyn Compressor>, chunker: TextChunker) -> Self {
        Self {
            extractor: Extractor::new(),
            compressor,
            chunker,
        }
    }

    /// The chunker in use
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Full ingestion: extract + compress + chunk
    pub async fn ingest(&self, path: impl AsRef<Path>) -> Result<(Document, Vec<Passage>)> {
        let document = self.extractor.extract(path).await?;
        let passages = self.prepare(&document).await?;
        Ok((document, passages))
    }

    /// Compress and chunk every page, in page order then split order.
    /// Pages without text contribute no passages.
    pub async fn prepare(&self, document: &Document) -> Result<Vec<Passage>> {
        let mut passages = Vec::new();

        for page in &document.pages {
            if !page.has_text() {
                tracing::debug!(page = page.number, "Skipping page without text");
                continue;
            }

            let compressed = self.compressor.compress(&page.raw_text).await?;
            let page_passages = self.chunker.chunk(&compressed, page.number, &page.raw_text);

            tracing::debug!(
                page = page.number,
                raw_chars = page.raw_text.chars().count(),
                compressed_chars = compressed.chars().count(),
                passages = page_passages.len(),
                compressor = self.compressor.name(),
                "Chunked page"
            );

            passages.extend(page_passages);
        }

        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::{GenerativeCompressor, WhitespaceCompressor};
    use crate::test_support::{FailingGenerator, RecordingGenerator};
    use crate::types::{FileType, Page};

    fn document(pages: Vec<Page>) -> Document {
        Document::new("/tmp/policy.txt", "policy.txt", FileType::Txt, String::new(), pages)
    }

    #[tokio::test]
    async fn test_passages_keep_page_order() {
        let pipeline = IngestPipeline::new(Arc::new(WhitespaceCompressor), TextChunker::new(40, 5));
        let doc = document(vec![
            Page::new(1, "Employees get 15 vacation days per year.   Unused days expire."),
            Page::new(2, "   \n  "),
            Page::new(3, "Remote work requires manager approval."),
        ]);

        let passages = pipeline.prepare(&doc).await.unwrap();
        assert!(passages.len() >= 3);

        let pages: Vec<u32> = passages.iter().map(|p| p.page_number).collect();
        let mut sorted = pages.clone();
        sorted.sort();
        assert_eq!(pages, sorted);
        assert!(!pages.contains(&2));
        assert!(passages.iter().all(|p| p.text.chars().count() <= 40));
    }

    #[tokio::test]
    async fn test_snippet_comes_from_raw_text() {
        let pipeline = IngestPipeline::new(
            Arc::new(GenerativeCompressor::new(Arc::new(RecordingGenerator::new("Short.")))),
            TextChunker::default(),
        );
        let doc = document(vec![Page::new(1, "A   long   original page.")]);

        let passages = pipeline.prepare(&doc).await.unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, "Short.");
        assert_eq!(passages[0].original_snippet, "A   long   original page.");
    }

    #[tokio::test]
    async fn test_compression_failure_aborts() {
        let pipeline = IngestPipeline::new(
            Arc::new(GenerativeCompressor::new(Arc::new(FailingGenerator))),
            TextChunker::default(),
        );
        let doc = document(vec![Page::new(1, "text")]);
        let err = pipeline.prepare(&doc).await.unwrap_err();
        assert!(matches!(err, Error::Compression(_)));
    }

    #[tokio::test]
    async fn test_ingest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        std::fs::write(&path, "Page one text.\u{000C}Page two text.").unwrap();

        let pipeline = IngestPipeline::new(Arc::new(WhitespaceCompressor), TextChunker::default());
        let (doc, passages) = pipeline.ingest(&path).await.unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[1].page_number, 2);
        assert_eq!(passages[1].text, "Page two text.");
    }
}
