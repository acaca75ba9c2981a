//! Cosine distance.
//!
//! `distance(a, b) = 1 - (a . b) / (|a| |b|)`, in `[0, 2]`. If either vector
//! has zero norm the similarity is taken to be 0, so the distance is 1.
//! Identical non-zero vectors are at distance exactly 0.

/// Distances this close to zero are re-checked for exact equality.
const SELF_MATCH_TOLERANCE: f64 = 1e-12;

#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[must_use]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_distance(a, b)
}

#[must_use]
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    cosine_distance_with_norms(a, norm(a), b, norm(b))
}

/// Cosine distance with precomputed norms.
///
/// Symmetric: swapping `(a, norm_a)` with `(b, norm_b)` gives a bit-identical
/// result.
pub(crate) fn cosine_distance_with_norms(a: &[f64], norm_a: f64, b: &[f64], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let similarity = dot(a, b) / (norm_a * norm_b);
    let distance = (1.0 - similarity).clamp(0.0, 2.0);

    if distance < SELF_MATCH_TOLERANCE && a == b {
        0.0
    } else {
        distance
    }
}
