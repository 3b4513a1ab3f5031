//! Passages and their vectors kept in one ordered structure

use crate::error::{Error, Result};
use crate::types::Passage;

use super::index::{FlatL2Index, IndexHit, VectorIndex};

/// Owns the passages of one document together with their vector index.
/// Slot `i` of the index always holds the vector of `passages[i]`.
pub struct PassageStore {
    passages: Vec<Passage>,
    index: Box<dyn VectorIndex>,
}

/// A search hit resolved to its passage
#[derive(Debug, Clone)]
pub struct PassageHit<'a> {
    /// Passage at the hit position
    pub passage: &'a Passage,
    /// Retrieval rank (0 = nearest)
    pub rank: usize,
    /// L2 distance to the query
    pub distance: f32,
}

impl PassageStore {
    /// Build a store backed by a [`FlatL2Index`]
    pub fn build(entries: Vec<(Passage, Vec<f32>)>) -> Result<Self> {
        Self::build_with_index(entries, Box::new(FlatL2Index::new()))
    }

    /// Build a store on a caller-supplied index. Any prior index contents are replaced.
    pub fn build_with_index(
        entries: Vec<(Passage, Vec<f32>)>,
        mut index: Box<dyn VectorIndex>,
    ) -> Result<Self> {
        let (passages, vectors): (Vec<Passage>, Vec<Vec<f32>>) = entries.into_iter().unzip();
        index.build(vectors)?;

        if index.len() != passages.len() {
            return Err(Error::internal(format!(
                "Index holds {} vectors for {} passages",
                index.len(),
                passages.len()
            )));
        }

        Ok(Self { passages, index })
    }

    /// Nearest passages to `query`, in rank order
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<PassageHit<'_>>> {
        self.index
            .search(query, k)?
            .into_iter()
            .enumerate()
            .map(|(rank, IndexHit { index, distance })| {
                let passage = self.passages.get(index).ok_or_else(|| {
                    Error::internal(format!("Index returned out-of-range position {}", index))
                })?;
                Ok(PassageHit {
                    passage,
                    rank,
                    distance,
                })
            })
            .collect()
    }

    /// Number of stored passages
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// All passages in index order
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Passage at a given index position
    pub fn get(&self, index: usize) -> Option<&Passage> {
        self.passages.get(index)
    }

    /// Vector dimensionality
    pub fn dimensions(&self) -> Option<usize> {
        self.index.dimensions()
    }
}

impl std::fmt::Debug for PassageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassageStore")
            .field("passages", &self.passages.len())
            .field("dimensions", &self.index.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, page_number: u32) -> Passage {
        Passage {
            text: text.to_string(),
            page_number,
            original_snippet: String::new(),
        }
    }

    #[test]
    fn test_hits_resolve_to_passages() {
        let store = PassageStore::build(vec![
            (passage("far", 1), vec![10.0, 0.0]),
            (passage("near", 2), vec![1.0, 0.0]),
            (passage("middle", 2), vec![4.0, 0.0]),
        ])
        .unwrap();

        let hits = store.search(&[0.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].passage.text, "near");
        assert_eq!(hits[0].rank, 0);
        assert_eq!(hits[1].passage.text, "middle");
        assert_eq!(hits[1].rank, 1);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_empty_store_is_empty_index() {
        let err = PassageStore::build(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyIndex));
    }

    #[test]
    fn test_accessors() {
        let store = PassageStore::build(vec![(passage("only", 3), vec![0.0; 4])]).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.dimensions(), Some(4));
        assert_eq!(store.get(0).map(|p| p.page_number), Some(3));
        assert!(store.get(1).is_none());
    }
}
