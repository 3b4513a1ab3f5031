//! Query-time retrieval: embed, search, assemble context and citations

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::citation::truncate_excerpt;
use crate::providers::Embedder;
use crate::types::{Citation, RetrievedContext};

use super::store::PassageStore;

/// Default citation excerpt length in characters
pub const DEFAULT_EXCERPT_CHARS: usize = 150;

/// Retrieves the passages closest to a question
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    excerpt_chars: usize,
}

impl Retriever {
    /// Create a retriever that embeds queries with `embedder`
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Set the citation excerpt length
    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Retrieve the `k` nearest passages. `k` beyond the corpus size is clamped.
    pub async fn retrieve(
        &self,
        store: &PassageStore,
        query: &str,
        k: usize,
    ) -> Result<RetrievedContext> {
        if store.is_empty() {
            return Err(Error::NotBuilt);
        }

        let query_vector = self.embedder.embed(query).await?;
        let hits = store.search(&query_vector, k)?;

        let mut blocks = Vec::with_capacity(hits.len());
        let mut citations = Vec::with_capacity(hits.len());
        let mut pages = BTreeSet::new();

        for hit in &hits {
            let passage = hit.passage;
            blocks.push(format!("[Page {}]\n{}", passage.page_number, passage.text));
            citations.push(Citation {
                page_number: passage.page_number,
                excerpt: truncate_excerpt(&passage.text, self.excerpt_chars),
                rank: hit.rank,
                distance: hit.distance,
            });
            pages.insert(passage.page_number);
        }

        tracing::debug!(
            requested = k,
            returned = hits.len(),
            pages = ?pages,
            "Retrieved passages"
        );

        Ok(RetrievedContext {
            context: blocks.join("\n\n"),
            citations,
            relevant_pages: pages.into_iter().collect(),
        })
    }
}
