use serde::{Deserialize, Serialize};

/// A single catalog track: raw audio features plus display metadata.
///
/// A track has no identifier of its own. Its identity is its ordinal
/// position within the [`Catalog`](crate::Catalog) it was loaded into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,

    /// Raw feature values, ordered by the catalog's feature schema.
    pub features: Vec<f64>,

    /// Upstream track identifier (e.g. a Spotify track ID).
    pub track_id: Option<String>,

    pub genre: Option<String>,

    /// Cover art URL, passed through to the presentation layer untouched.
    pub image_url: Option<String>,

    /// Audio preview URL, passed through to the presentation layer untouched.
    pub preview_url: Option<String>,

    /// Duration in milliseconds. Display only, never a similarity feature.
    pub duration_ms: Option<u64>,
}

impl Track {
    #[must_use]
    pub fn new(artist: impl Into<String>, title: impl Into<String>, features: Vec<f64>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            features,
            track_id: None,
            genre: None,
            image_url: None,
            preview_url: None,
            duration_ms: None,
        }
    }

    #[must_use]
    pub fn with_track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Exact, case-sensitive match on artist and title.
    #[must_use]
    pub fn matches(&self, artist: &str, title: &str) -> bool {
        self.artist == artist && self.title == title
    }
}
