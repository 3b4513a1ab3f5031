//! policy-rag: question answering over a single policy document
//!
//! A document is split into pages, compressed, chunked into overlapping
//! passages and embedded into an exact L2 index. Questions are answered by
//! retrieving the nearest passages and asking a generative model to answer
//! only from them, citing page numbers.
//!
//! ```no_run
//! # async fn run() -> policy_rag::Result<()> {
//! let rag = policy_rag::PolicyRag::from_config(policy_rag::RagConfig::default()).await?;
//! rag.load_document("handbook.pdf").await?;
//! let result = rag.ask("How many vacation days do employees get?").await?;
//! println!("{}\n\n{}", result.answer, result.format_sources());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod rag;
pub mod retrieval;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use rag::{PolicyRag, SessionState};
pub use types::{AnswerResult, Citation, Document, DocumentSummary, Page, Passage};
