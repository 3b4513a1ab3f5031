//! Single-document question answering session
//!
//! [`PolicyRag`] owns the whole lifecycle: loading a document runs
//! extraction, compression, chunking, embedding and index build end to end;
//! asking a question runs retrieval and grounded generation against the
//! currently loaded document.

use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::Answerer;
use crate::ingestion::{IngestPipeline, TextChunker};
use crate::providers::{self, Compressor, Embedder, Generator};
use crate::retrieval::{PassageStore, Retriever};
use crate::types::{AnswerResult, Document, DocumentSummary};

/// Whether a document is ready to be questioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document loaded; `ask` fails with `NotLoaded`
    Unloaded,
    /// A document is indexed and can be questioned
    Loaded,
}

/// Everything derived from one loaded document
struct LoadedDocument {
    document: Document,
    store: PassageStore,
}

/// Policy document question-answering orchestrator
pub struct PolicyRag {
    config: RagConfig,
    embedder: Arc<dyn Embedder>,
    pipeline: IngestPipeline,
    retriever: Retriever,
    answerer: Answerer,
    loaded: RwLock<Option<Arc<LoadedDocument>>>,
}

impl PolicyRag {
    /// Create an orchestrator from explicit collaborators
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn Embedder>,
        compressor: Arc<dyn Compressor>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let pipeline = IngestPipeline::new(compressor, TextChunker::from_config(&config.chunking));
        let retriever =
            Retriever::new(embedder.clone()).with_excerpt_chars(config.retrieval.excerpt_chars);
        let answerer = Answerer::new(generator);

        Self {
            config,
            embedder,
            pipeline,
            retriever,
            answerer,
            loaded: RwLock::new(None),
        }
    }

    /// Create an orchestrator with the providers selected in `config`
    pub async fn from_config(config: RagConfig) -> Result<Self> {
        config.validate()?;

        let embedder = providers::build_embedder(&config).await?;
        let generator = providers::build_generator(&config)?;
        let compressor = providers::build_compressor(&config, generator.clone());

        Ok(Self::new(config, embedder, compressor, generator))
    }

    /// Configuration in use
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        if self.loaded.read().is_some() {
            SessionState::Loaded
        } else {
            SessionState::Unloaded
        }
    }

    /// Summary of the loaded document, if any
    pub fn document(&self) -> Option<DocumentSummary> {
        self.loaded
            .read()
            .as_ref()
            .map(|loaded| summarize(&loaded.document, loaded.store.len()))
    }

    /// Discard the loaded document
    pub fn unload(&self) {
        if self.loaded.write().take().is_some() {
            tracing::info!("Document unloaded");
        }
    }

    /// Load a document, replacing whatever was loaded before.
    ///
    /// The previous document is discarded before the new one is processed,
    /// so a failure at any stage leaves the session unloaded.
    pub async fn load_document(&self, path: impl AsRef<Path>) -> Result<DocumentSummary> {
        let path = path.as_ref();
        self.unload();

        tracing::info!("Loading document: {}", path.display());

        let (document, passages) = self.pipeline.ingest(path).await?;

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        tracing::info!(
            pages = document.page_count(),
            passages = texts.len(),
            embedder = self.embedder.name(),
            "Embedding passages"
        );

        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&texts).await?
        };

        if vectors.len() != passages.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                passages.len(),
                vectors.len()
            )));
        }

        let expected = self.embedder.dimensions();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(Error::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let store = PassageStore::build(passages.into_iter().zip(vectors).collect())?;
        let summary = summarize(&document, store.len());

        *self.loaded.write() = Some(Arc::new(LoadedDocument { document, store }));

        tracing::info!(
            filename = %summary.filename,
            pages = summary.page_count,
            empty_pages = summary.empty_pages,
            passages = summary.passage_count,
            "Document loaded"
        );

        Ok(summary)
    }

    /// Answer a question with the configured `top_k`
    pub async fn ask(&self, question: &str) -> Result<AnswerResult> {
        self.ask_with_top_k(question, self.config.retrieval.top_k).await
    }

    /// Answer a question from the `top_k` nearest passages. `top_k` must be at least 1.
    pub async fn ask_with_top_k(&self, question: &str, top_k: usize) -> Result<AnswerResult> {
        let loaded = self.loaded.read().clone().ok_or(Error::NotLoaded)?;
        if top_k == 0 {
            return Err(Error::Config("top_k must be > 0".to_string()));
        }

        tracing::info!(top_k, "Answering question: {}", question);

        let retrieved = self.retriever.retrieve(&loaded.store, question, top_k).await?;
        let answer = self.answerer.answer(question, &retrieved.context).await?;

        tracing::debug!(
            citations = retrieved.citations.len(),
            pages = ?retrieved.relevant_pages,
            answer_chars = answer.len(),
            "Answer generated"
        );

        Ok(AnswerResult {
            answer,
            citations: retrieved.citations,
            relevant_pages: retrieved.relevant_pages,
        })
    }
}

fn summarize(document: &Document, passage_count: usize) -> DocumentSummary {
    DocumentSummary {
        id: document.id,
        filename: document.filename.clone(),
        file_type: document.file_type,
        content_hash: document.content_hash.clone(),
        page_count: document.page_count(),
        empty_pages: document.pages.iter().filter(|p| !p.has_text()).count(),
        passage_count,
        loaded_at: document.loaded_at,
    }
}
