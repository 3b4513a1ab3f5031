//! Document, page and passage types with page provenance for citations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported source formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file, pages separated by form feeds
    Txt,
    /// Markdown file, pages separated by form feeds
    Markdown,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Unknown => "Unknown",
        }
    }
}

/// A single page of extracted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Raw extracted text; empty for image-only or unreadable pages
    pub raw_text: String,
}

impl Page {
    /// Create a page
    pub fn new(number: u32, raw_text: impl Into<String>) -> Self {
        Self {
            number,
            raw_text: raw_text.into(),
        }
    }

    /// Whether extraction yielded any non-whitespace text
    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }
}

/// A loaded source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Path the document was loaded from
    pub path: String,
    /// File name for display
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// SHA-256 of the raw file bytes
    pub content_hash: String,
    /// Pages in source order
    pub pages: Vec<Page>,
    /// Load timestamp
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(
        path: impl Into<String>,
        filename: impl Into<String>,
        file_type: FileType,
        content_hash: String,
        pages: Vec<Page>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            filename: filename.into(),
            file_type,
            content_hash,
            pages,
            loaded_at: chrono::Utc::now(),
        }
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Look up a page by its 1-based number
    pub fn page(&self, number: u32) -> Option<&Page> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .filter(|p| p.number == number)
    }
}

/// A bounded slice of page text, the unit that gets embedded and retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Passage text (compressed page text)
    pub text: String,
    /// Page this passage was cut from
    pub page_number: u32,
    /// Leading characters of the raw page text, for debugging
    pub original_snippet: String,
}

/// Summary of the currently loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID
    pub id: Uuid,
    /// File name
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Content hash
    pub content_hash: String,
    /// Number of pages extracted
    pub page_count: usize,
    /// Number of pages that produced no text
    pub empty_pages: usize,
    /// Number of indexed passages
    pub passage_count: usize,
    /// Load timestamp
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}
