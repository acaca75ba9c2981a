//! The ordered, immutable track catalog.
//!
//! Catalog order is significant: a track's position is its identity
//! everywhere downstream (normalized vectors, index entries, results).

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::{FeatureSchema, Track};

/// An ordered collection of tracks sharing one feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    schema: FeatureSchema,
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog, checking every track against the schema.
    ///
    /// Fails with [`Error::SchemaMismatch`] when a track's feature count
    /// differs from the schema dimension, and with [`Error::InvalidData`]
    /// when a feature value is NaN or infinite.
    pub fn new(schema: FeatureSchema, tracks: Vec<Track>) -> Result<Self> {
        let expected = schema.dimension();
        for (position, track) in tracks.iter().enumerate() {
            if track.features.len() != expected {
                return Err(Error::SchemaMismatch {
                    position,
                    expected,
                    found: track.features.len(),
                });
            }
            if let Some(bad) = track.features.iter().position(|v| !v.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "track {} has a non-finite value for '{}'",
                    position,
                    schema.fields()[bad]
                )));
            }
        }
        Ok(Self { schema, tracks })
    }

    #[must_use]
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Find the track with the given artist and title.
    ///
    /// When several rows share the same artist and title, the first one in
    /// catalog order wins.
    #[must_use]
    pub fn find(&self, artist: &str, title: &str) -> Option<(usize, &Track)> {
        self.tracks
            .iter()
            .enumerate()
            .find(|(_, track)| track.matches(artist, title))
    }

    /// Distinct artist names, sorted.
    #[must_use]
    pub fn artists(&self) -> Vec<&str> {
        self.tracks
            .iter()
            .map(|t| t.artist.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct track titles by one artist, sorted.
    #[must_use]
    pub fn titles_for(&self, artist: &str) -> Vec<&str> {
        self.tracks
            .iter()
            .filter(|t| t.artist == artist)
            .map(|t| t.title.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Raw feature rows in catalog order.
    #[must_use]
    pub fn feature_rows(&self) -> Vec<&[f64]> {
        self.tracks.iter().map(|t| t.features.as_slice()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_feature_schema() -> FeatureSchema {
        FeatureSchema::new(1, ["energy", "valence"]).unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(
            two_feature_schema(),
            vec![
                Track::new("Radiohead", "Reckoner", vec![0.4, 0.2]),
                Track::new("Björk", "Joga", vec![0.5, 0.1]),
                Track::new("Radiohead", "Airbag", vec![0.8, 0.3]),
                Track::new("Radiohead", "Reckoner", vec![0.9, 0.9]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_width() {
        let result = Catalog::new(
            two_feature_schema(),
            vec![
                Track::new("A", "One", vec![0.1, 0.2]),
                Track::new("A", "Two", vec![0.1]),
            ],
        );
        assert!(matches!(
            result,
            Err(Error::SchemaMismatch {
                position: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let result = Catalog::new(
            two_feature_schema(),
            vec![Track::new("A", "One", vec![0.1, f64::NAN])],
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_find_first_duplicate_wins() {
        let catalog = sample_catalog();
        let (index, track) = catalog.find("Radiohead", "Reckoner").unwrap();
        assert_eq!(index, 0);
        assert_eq!(track.features, vec![0.4, 0.2]);
    }

    #[test]
    fn test_find_missing() {
        let catalog = sample_catalog();
        assert!(catalog.find("Radiohead", "Creep").is_none());
    }

    #[test]
    fn test_artists_sorted_unique() {
        let catalog = sample_catalog();
        assert_eq!(catalog.artists(), vec!["Björk", "Radiohead"]);
    }

    #[test]
    fn test_titles_for_sorted_unique() {
        let catalog = sample_catalog();
        assert_eq!(catalog.titles_for("Radiohead"), vec!["Airbag", "Reckoner"]);
        assert!(catalog.titles_for("Nobody").is_empty());
    }

    #[test]
    fn test_feature_rows_in_order() {
        let catalog = sample_catalog();
        let rows = catalog.feature_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], &[0.8, 0.3]);
    }
}
