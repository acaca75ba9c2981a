//! Error types for normalization, indexing, and recommendation.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the similarity search core.
///
/// Zero-variance features and zero-norm vectors are handled by policy and
/// never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Normalization parameters were requested for a catalog with no rows.
    #[error("cannot fit normalization parameters on an empty catalog")]
    EmptyCatalog,

    /// A raw vector's width differs from the fitted feature schema.
    #[error("vector has {found} features, schema expects {expected}")]
    SchemaMismatch { expected: usize, found: usize },

    /// An index was built from zero vectors.
    #[error("cannot build a similarity index from zero vectors")]
    EmptyIndex,

    /// A query vector's width differs from the indexed dimensionality.
    #[error("query vector has dimension {found}, index expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    /// `k` was zero or larger than the number of indexed vectors.
    #[error("invalid neighbor count {k} for an index of {len} vectors")]
    InvalidK { k: usize, len: usize },

    /// No catalog track matched the requested artist and title.
    #[error("no track titled '{title}' by '{artist}'")]
    TrackNotFound { artist: String, title: String },

    /// A track ordinal was outside the catalog.
    #[error("track index {index} is outside a catalog of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    /// The snapshot build did not finish within the caller's timeout.
    #[error("snapshot build timed out after {0:?}")]
    BuildTimedOut(Duration),

    /// The snapshot build task panicked or was cancelled.
    #[error("snapshot build failed: {0}")]
    BuildFailed(String),

    /// An error propagated from the catalog layer.
    #[error("catalog error: {0}")]
    Catalog(#[from] cadenza_core::Error),
}

impl Error {
    /// Returns `true` when the error reflects the caller's selection rather
    /// than the state of the catalog or index.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Self::TrackNotFound { .. } | Self::InvalidK { .. } | Self::IndexOutOfRange { .. }
        )
    }
}

/// Convenience alias for search results.
pub type Result<T> = std::result::Result<T, Error>;
