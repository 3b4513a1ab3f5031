//! Exact nearest-neighbour index over passage vectors

use crate::error::{Error, Result};

/// One search hit: passage position and L2 distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    /// 0-based position of the vector passed to `build`
    pub index: usize,
    /// Euclidean distance (lower is more similar)
    pub distance: f32,
}

/// Vector index addressed by insertion position
pub trait VectorIndex: Send + Sync {
    /// Replace any prior contents with `vectors`
    fn build(&mut self, vectors: Vec<Vec<f32>>) -> Result<()>;

    /// Return the `min(k, len)` nearest vectors by ascending distance,
    /// ties broken by insertion position
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>>;

    /// Number of indexed vectors
    fn len(&self) -> usize;

    /// Whether the index holds no vectors
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality of the indexed vectors, if built
    fn dimensions(&self) -> Option<usize>;
}

/// Brute-force L2 index over raw (non-normalised) vectors
#[derive(Debug, Clone, Default)]
pub struct FlatL2Index {
    dimensions: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Create an empty, unbuilt index
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `build` has succeeded
    pub fn is_built(&self) -> bool {
        self.dimensions.is_some()
    }

    fn reset(&mut self) {
        self.dimensions = None;
        self.vectors.clear();
    }
}

/// Euclidean distance between two equal-length vectors
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

impl VectorIndex for FlatL2Index {
    fn build(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        self.reset();

        let Some(first) = vectors.first() else {
            return Err(Error::EmptyIndex);
        };
        let dimensions = first.len();

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: bad.len(),
            });
        }

        tracing::debug!(vectors = vectors.len(), dimensions, "Built flat L2 index");

        self.dimensions = Some(dimensions);
        self.vectors = vectors;
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        let dimensions = self.dimensions.ok_or(Error::NotBuilt)?;
        if query.len() != dimensions {
            return Err(Error::DimensionMismatch {
                expected: dimensions,
                actual: query.len(),
            });
        }

        let mut hits: Vec<IndexHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| IndexHit {
                index,
                distance: l2_distance(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        hits.truncate(k.min(self.vectors.len()));

        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(vectors: Vec<Vec<f32>>) -> FlatL2Index {
        let mut index = FlatL2Index::new();
        index.build(vectors).unwrap();
        index
    }

    #[test]
    fn test_known_distance_ranking() {
        let index = built(vec![
            vec![0.0, 0.0],
            vec![3.0, 4.0],
            vec![1.0, 0.0],
            vec![0.0, 2.0],
        ]);

        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 2, 3]);
        assert_eq!(hits[0].distance, 0.0);
        assert!((hits[1].distance - 1.0).abs() < 1e-6);
        assert!((hits[2].distance - 2.0).abs() < 1e-6);

        let all = index.search(&[0.0, 0.0], 4).unwrap();
        assert!((all[3].distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = built(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![-1.0, 0.0],
            vec![0.0, -1.0],
        ]);

        let hits = index.search(&[0.0, 0.0], 4).unwrap();
        let order: Vec<usize> = hits.iter().map(|h| h.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_clamps_and_indices_in_bounds() {
        let index = built(vec![vec![0.5; 3], vec![1.5; 3], vec![2.5; 3]]);

        let hits = index.search(&[0.0; 3], 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.index < index.len()));

        assert!(index.search(&[0.0; 3], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_before_build() {
        let index = FlatL2Index::new();
        assert!(matches!(index.search(&[1.0], 1), Err(Error::NotBuilt)));
    }

    #[test]
    fn test_empty_build_leaves_index_unbuilt() {
        let mut index = built(vec![vec![1.0, 2.0]]);
        assert!(matches!(index.build(Vec::new()), Err(Error::EmptyIndex)));
        assert!(!index.is_built());
        assert!(index.is_empty());
        assert!(matches!(index.search(&[1.0, 2.0], 1), Err(Error::NotBuilt)));
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = built(vec![vec![0.0], vec![1.0], vec![2.0]]);
        index.build(vec![vec![9.0, 9.0]]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.dimensions(), Some(2));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = FlatL2Index::new();
        let err = index.build(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));

        let index = built(vec![vec![1.0, 2.0]]);
        assert!(matches!(
            index.search(&[1.0, 2.0, 3.0], 1),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
