//! The recommendation query engine.

use cadenza_core::{Catalog, TrackSummary};

use crate::error::{Error, Result};
use crate::index::NeighborIndex;

/// Recommend up to `k` tracks similar to the one titled `title` by `artist`.
///
/// The first catalog row matching artist and title is used, so duplicates
/// later in the catalog are never the query track. The query track itself is
/// never part of the result. Fewer than `k` summaries come back only when the
/// rest of the catalog has fewer than `k` tracks.
pub fn recommend<I: NeighborIndex + ?Sized>(
    catalog: &Catalog,
    index: &I,
    artist: &str,
    title: &str,
    k: usize,
) -> Result<Vec<TrackSummary>> {
    let (position, _) = catalog
        .find(artist, title)
        .ok_or_else(|| Error::TrackNotFound {
            artist: artist.to_string(),
            title: title.to_string(),
        })?;

    log::debug!("Resolved '{}' by '{}' to track {}", title, artist, position);
    recommend_by_index(catalog, index, position, k)
}

/// Recommend up to `k` tracks similar to the track at `position`.
pub fn recommend_by_index<I: NeighborIndex + ?Sized>(
    catalog: &Catalog,
    index: &I,
    position: usize,
    k: usize,
) -> Result<Vec<TrackSummary>> {
    if k == 0 {
        return Err(Error::InvalidK { k, len: index.len() });
    }

    let query = index.vector(position).ok_or(Error::IndexOutOfRange {
        index: position,
        len: index.len(),
    })?;

    // One extra slot for the query track, which matches itself at distance 0.
    let requested = k.saturating_add(1).min(index.len());
    let neighbors = index.query(query, requested)?;

    let summaries = neighbors
        .into_iter()
        .filter(|n| n.index != position)
        .take(k)
        .map(|n| {
            catalog
                .get(n.index)
                .map(|track| TrackSummary::from_track(n.index, track, n.distance))
                .ok_or(Error::IndexOutOfRange {
                    index: n.index,
                    len: catalog.len(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("Track {}: {} recommendations", position, summaries.len());
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ExactCosineIndex;
    use cadenza_core::{FeatureSchema, Track};

    fn scenario() -> (Catalog, ExactCosineIndex) {
        let rows = [
            ("Artist A", "Zero", [1.0, 0.0]),
            ("Artist B", "One", [0.9, 0.1]),
            ("Artist C", "Two", [0.0, 1.0]),
            ("Artist D", "Three", [0.1, 0.9]),
            ("Artist E", "Four", [1.0, 1.0]),
            ("Artist F", "Five", [-1.0, -1.0]),
        ];
        let tracks = rows
            .iter()
            .map(|(artist, title, f)| {
                Track::new(*artist, *title, f.to_vec())
                    .with_preview_url(format!("https://example.com/{title}.mp3"))
            })
            .collect();
        let schema = FeatureSchema::new(1, ["x", "y"]).unwrap();
        let catalog = Catalog::new(schema, tracks).unwrap();
        let index = ExactCosineIndex::build(rows.iter().map(|r| r.2.to_vec()).collect()).unwrap();
        (catalog, index)
    }

    fn titles(summaries: &[TrackSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_scenario_top_two() {
        let (catalog, index) = scenario();
        let result = recommend(&catalog, &index, "Artist A", "Zero", 2).unwrap();

        assert_eq!(titles(&result), vec!["One", "Four"]);
        assert_eq!(
            result[0].preview_url.as_deref(),
            Some("https://example.com/One.mp3")
        );
    }

    #[test]
    fn test_anti_parallel_ranks_last() {
        let (catalog, index) = scenario();
        let result = recommend(&catalog, &index, "Artist A", "Zero", 5).unwrap();

        assert_eq!(titles(&result), vec!["One", "Four", "Three", "Two", "Five"]);
        assert!(result.last().unwrap().distance > 1.7);
    }

    #[test]
    fn test_never_includes_self() {
        let (catalog, index) = scenario();
        for (position, track) in catalog.tracks().iter().enumerate() {
            let result = recommend(&catalog, &index, &track.artist, &track.title, 5).unwrap();
            assert_eq!(result.len(), 5);
            assert!(result.iter().all(|s| s.index != position));
        }
    }

    #[test]
    fn test_small_corpus_returns_what_exists() {
        let schema = FeatureSchema::new(1, ["x"]).unwrap();
        let catalog = Catalog::new(
            schema,
            vec![
                Track::new("A", "a", vec![1.0]),
                Track::new("B", "b", vec![2.0]),
                Track::new("C", "c", vec![-1.0]),
            ],
        )
        .unwrap();
        let index = ExactCosineIndex::build(vec![vec![1.0], vec![2.0], vec![-1.0]]).unwrap();

        let result = recommend(&catalog, &index, "A", "a", 5).unwrap();
        assert_eq!(titles(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_single_track_catalog() {
        let schema = FeatureSchema::new(1, ["x"]).unwrap();
        let catalog = Catalog::new(schema, vec![Track::new("A", "a", vec![1.0])]).unwrap();
        let index = ExactCosineIndex::build(vec![vec![1.0]]).unwrap();

        assert!(recommend(&catalog, &index, "A", "a", 3).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_selection_uses_first_row() {
        let schema = FeatureSchema::new(1, ["x", "y"]).unwrap();
        let catalog = Catalog::new(
            schema,
            vec![
                Track::new("Dup", "Song", vec![1.0, 0.0]),
                Track::new("Other", "Near first", vec![1.0, 0.1]),
                Track::new("Other", "Near second", vec![0.0, 1.0]),
                Track::new("Dup", "Song", vec![0.1, 1.0]),
            ],
        )
        .unwrap();
        let index = ExactCosineIndex::build(
            catalog.tracks().iter().map(|t| t.features.clone()).collect(),
        )
        .unwrap();

        let result = recommend(&catalog, &index, "Dup", "Song", 1).unwrap();
        assert_eq!(titles(&result), vec!["Near first"]);

        // The later duplicate is an ordinary candidate for the first.
        let all = recommend(&catalog, &index, "Dup", "Song", 3).unwrap();
        assert!(all.iter().any(|s| s.index == 3));
    }

    #[test]
    fn test_track_not_found() {
        let (catalog, index) = scenario();
        let err = recommend(&catalog, &index, "Artist A", "Missing", 2).unwrap_err();
        assert!(matches!(err, Error::TrackNotFound { .. }));
        assert!(err.is_selection_error());
    }

    #[test]
    fn test_zero_k() {
        let (catalog, index) = scenario();
        assert!(matches!(
            recommend(&catalog, &index, "Artist A", "Zero", 0),
            Err(Error::InvalidK { k: 0, .. })
        ));
    }

    #[test]
    fn test_huge_k_is_clamped() {
        let (catalog, index) = scenario();
        let result = recommend_by_index(&catalog, &index, 0, usize::MAX).unwrap();
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_position_out_of_range() {
        let (catalog, index) = scenario();
        assert!(matches!(
            recommend_by_index(&catalog, &index, 6, 1),
            Err(Error::IndexOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_concurrent_queries_agree() {
        let (catalog, index) = scenario();
        let expected = recommend(&catalog, &index, "Artist D", "Three", 3).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| recommend(&catalog, &index, "Artist D", "Three", 3)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), expected);
            }
        });
    }
}
