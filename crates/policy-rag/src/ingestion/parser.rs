//! Page-level text extraction

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Document, FileType, Page};

/// Form feed, the page separator for plain-text documents
const PAGE_BREAK: char = '\u{000C}';

/// Extracts per-page text from PDF and plain-text documents
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Read a document from disk and split it into numbered pages
    pub async fn extract(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::document_read(&display, e.to_string()))?;

        let file_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown);

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| display.clone());

        let content_hash = hash_bytes(&data);
        let pages = {
            let display = display.clone();
            tokio::task::spawn_blocking(move || Self::parse(&display, file_type, &data))
                .await
                .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??
        };

        tracing::debug!(
            path = %path.display(),
            file_type = file_type.display_name(),
            pages = pages.len(),
            "Document extracted"
        );

        Ok(Document::new(display, filename, file_type, content_hash, pages))
    }

    /// Parse raw bytes according to the file type
    pub fn parse(path: &str, file_type: FileType, data: &[u8]) -> Result<Vec<Page>> {
        match file_type {
            FileType::Pdf => Self::parse_pdf(path, data),
            FileType::Txt | FileType::Markdown => Self::parse_text(path, data),
            FileType::Unknown => Err(Error::document_read(path, "Unsupported file type")),
        }
    }

    /// Parse a PDF page by page
    fn parse_pdf(path: &str, data: &[u8]) -> Result<Vec<Page>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::document_read(path, format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(Error::document_read(path, "PDF contains no pages"));
        }

        let pages = page_numbers
            .iter()
            .enumerate()
            .map(|(i, &source_number)| {
                let text = match doc.extract_text(&[source_number]) {
                    Ok(text) => clean_page_text(&text),
                    Err(e) => {
                        tracing::warn!(
                            page = i + 1,
                            error = %e,
                            "Failed to extract text from page, keeping it empty"
                        );
                        String::new()
                    }
                };
                Page::new(i as u32 + 1, text)
            })
            .collect();

        Ok(pages)
    }

    /// Parse plain text or markdown; form feeds separate pages
    fn parse_text(path: &str, data: &[u8]) -> Result<Vec<Page>> {
        let content = std::str::from_utf8(data)
            .map_err(|e| Error::document_read(path, format!("File is not valid UTF-8: {}", e)))?;

        let pages = content
            .split(PAGE_BREAK)
            .enumerate()
            .map(|(i, text)| Page::new(i as u32 + 1, clean_page_text(text)))
            .collect();

        Ok(pages)
    }
}

/// Strip null bytes and the BOM, normalise line endings
fn clean_page_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{FEFF}', "")
        .replace("\r\n", "\n")
}

fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_text_pages_split_on_form_feed() {
        let pages =
            Extractor::parse("p.txt", FileType::Txt, b"first page\x0Csecond page\x0C").unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], Page::new(1, "first page"));
        assert_eq!(pages[1], Page::new(2, "second page"));
        assert_eq!(pages[2].number, 3);
        assert!(!pages[2].has_text());
    }

    #[test]
    fn test_text_without_form_feed_is_one_page() {
        let pages = Extractor::parse("p.md", FileType::Markdown, b"# Policy\r\n\r\nBody").unwrap();
        assert_eq!(pages, vec![Page::new(1, "# Policy\n\nBody")]);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let err = Extractor::parse("p.txt", FileType::Txt, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));
    }

    #[test]
    fn test_garbage_pdf_is_read_error() {
        let err = Extractor::parse("p.pdf", FileType::Pdf, b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));
    }

    #[test]
    fn test_unknown_type_is_read_error() {
        let err = Extractor::parse("p.exe", FileType::Unknown, b"MZ").unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));
    }

    #[tokio::test]
    async fn test_extract_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Page one\x0CPage two").unwrap();

        let doc = Extractor::new().extract(file.path()).await.unwrap();
        assert_eq!(doc.file_type, FileType::Txt);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].raw_text, "Page two");
        assert_eq!(doc.content_hash.len(), 64);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Extractor::new()
            .extract(dir.path().join("missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocumentRead { .. }));
    }
}
