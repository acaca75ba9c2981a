use serde::{Deserialize, Serialize};

use crate::model::Track;

/// A recommended track, ready for the presentation layer.
///
/// Display fields are copied verbatim from the catalog; media URLs are
/// neither fetched nor validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Ordinal position of the track in the catalog.
    pub index: usize,
    pub artist: String,
    pub title: String,

    /// Cosine distance from the queried track (0 = same direction).
    pub distance: f64,

    pub track_id: Option<String>,
    pub genre: Option<String>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
}

impl TrackSummary {
    #[must_use]
    pub fn from_track(index: usize, track: &Track, distance: f64) -> Self {
        Self {
            index,
            artist: track.artist.clone(),
            title: track.title.clone(),
            distance,
            track_id: track.track_id.clone(),
            genre: track.genre.clone(),
            image_url: track.image_url.clone(),
            preview_url: track.preview_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_copies_display_fields() {
        let track = Track::new("Björk", "Hyperballad", vec![0.1])
            .with_image_url("not even a url")
            .with_preview_url("https://example.com/preview.mp3");

        let summary = TrackSummary::from_track(7, &track, 0.25);

        assert_eq!(summary.index, 7);
        assert_eq!(summary.artist, "Björk");
        assert_eq!(summary.title, "Hyperballad");
        assert_eq!(summary.image_url.as_deref(), Some("not even a url"));
        assert_eq!(
            summary.preview_url.as_deref(),
            Some("https://example.com/preview.mp3")
        );
        assert!((summary.distance - 0.25).abs() < f64::EPSILON);
    }
}
