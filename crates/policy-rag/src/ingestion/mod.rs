//! Document ingestion: page extraction, chunking and the ingest pipeline

mod chunker;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use parser::Extractor;
pub use processor::IngestPipeline;
