//! Core data types

pub mod document;
pub mod response;

pub use document::{Document, DocumentSummary, FileType, Page, Passage};
pub use response::{AnswerResult, Citation, RetrievedContext};
