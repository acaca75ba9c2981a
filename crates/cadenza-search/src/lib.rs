//! Similarity search for cadenza.
//!
//! Standardizes raw audio features against catalog-wide statistics, indexes
//! the normalized vectors, and answers "k most similar tracks" queries by
//! cosine distance with deterministic ordering.
//!
//! Everything is built once per catalog into an immutable [`Snapshot`] that
//! any number of readers may query concurrently. Replacing the catalog means
//! building a new snapshot and swapping it into a [`SharedSnapshot`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod distance;
pub mod error;
pub mod index;
pub mod normalize;
pub mod recommend;
pub mod snapshot;

pub use error::{Error, Result};
pub use index::{ExactCosineIndex, Neighbor, NeighborIndex};
pub use normalize::NormalizationParameters;
pub use recommend::{recommend, recommend_by_index};
pub use snapshot::{build_snapshot_with_timeout, SharedSnapshot, Snapshot};
