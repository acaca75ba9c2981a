//! k-nearest-neighbor search over normalized vectors.
//!
//! [`NeighborIndex`] is the seam for search backends. [`ExactCosineIndex`]
//! scores every stored vector; an approximate backend can implement the same
//! trait as long as it keeps the ordering contract below.
//!
//! # Ordering contract
//!
//! Results are sorted by ascending cosine distance, ties broken by ascending
//! track index. A stored vector queried against itself is at distance 0, so
//! an unfiltered query for a catalog track returns that track first (or tied
//! first with exact duplicates at lower indices). Callers that want
//! "similar but different" must ask for one extra neighbor and drop the
//! query's own index.

use std::cmp::Ordering;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::distance::{cosine_distance_with_norms, norm};
use crate::error::{Error, Result};

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Ordinal track index.
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

/// A read-only, queryable set of vectors keyed by ordinal index.
pub trait NeighborIndex: Send + Sync + fmt::Debug {
    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of every stored vector.
    fn dimension(&self) -> usize;

    /// The stored vector for a track, if the index is in range.
    fn vector(&self, index: usize) -> Option<&[f64]>;

    /// The `k` stored vectors nearest to `query`.
    ///
    /// Fails with [`Error::DimensionMismatch`] for a query of the wrong width
    /// and [`Error::InvalidK`] if `k` is 0 or exceeds [`len`](Self::len).
    fn query(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>>;
}

/// Brute-force cosine index. Never mutated after [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ExactCosineIndex {
    vectors: Vec<Vec<f64>>,
    norms: Vec<f64>,
    dimension: usize,
}

impl ExactCosineIndex {
    /// Build an index over `vectors`; position in the list is the track index.
    pub fn build(vectors: Vec<Vec<f64>>) -> Result<Self> {
        let dimension = vectors.first().ok_or(Error::EmptyIndex)?.len();

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                found: bad.len(),
            });
        }

        let norms = vectors.iter().map(|v| norm(v)).collect();
        log::debug!(
            "Built exact cosine index: {} vectors x {} dimensions",
            vectors.len(),
            dimension
        );

        Ok(Self {
            vectors,
            norms,
            dimension,
        })
    }
}

impl NeighborIndex for ExactCosineIndex {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn vector(&self, index: usize) -> Option<&[f64]> {
        self.vectors.get(index).map(Vec::as_slice)
    }

    fn query(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }
        if k == 0 || k > self.len() {
            return Err(Error::InvalidK { k, len: self.len() });
        }

        let query_norm = norm(query);
        let mut scored: Vec<Neighbor> = self
            .vectors
            .par_iter()
            .zip(self.norms.par_iter())
            .enumerate()
            .map(|(index, (vector, &vector_norm))| Neighbor {
                index,
                distance: cosine_distance_with_norms(query, query_norm, vector, vector_norm),
            })
            .collect();

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, Neighbor::rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(Neighbor::rank);

        Ok(scored)
    }
}
