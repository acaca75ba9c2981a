use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Fields that never take part in similarity, even if a caller lists them.
///
/// Raw duration is measured in milliseconds and dwarfs the bounded audio
/// descriptors after any linear scaling.
pub const EXCLUDED_FEATURES: &[&str] = &["duration_ms"];

/// Numeric columns of the Spotify audio features dataset, minus duration.
const SPOTIFY_V1_FEATURES: &[&str] = &[
    "popularity",
    "acousticness",
    "danceability",
    "energy",
    "instrumentalness",
    "liveness",
    "loudness",
    "speechiness",
    "tempo",
    "valence",
];

/// An explicit, versioned, ordered list of named numeric features.
///
/// Every track in a catalog carries exactly one value per field, in this
/// order. The schema is fixed when a catalog is loaded; rows that do not fit
/// it are rejected rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u32,
    fields: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from an ordered list of field names.
    ///
    /// Excluded fields (see [`EXCLUDED_FEATURES`]) are dropped. Duplicate
    /// names and an empty resulting list are rejected.
    pub fn new<I, S>(version: u32, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for field in fields {
            let field: String = field.into();
            let field = field.trim().to_string();
            if field.is_empty() {
                return Err(Error::InvalidSchema("empty field name".to_string()));
            }
            if EXCLUDED_FEATURES.contains(&field.as_str()) {
                log::debug!("Dropping excluded feature '{}' from schema", field);
                continue;
            }
            if !seen.insert(field.clone()) {
                return Err(Error::InvalidSchema(format!("duplicate field '{field}'")));
            }
            kept.push(field);
        }

        if kept.is_empty() {
            return Err(Error::InvalidSchema(
                "schema must contain at least one comparable feature".to_string(),
            ));
        }

        Ok(Self {
            version,
            fields: kept,
        })
    }

    /// The default schema for the Spotify audio features dataset (version 1).
    #[must_use]
    pub fn spotify_v1() -> Self {
        Self {
            version: 1,
            fields: SPOTIFY_V1_FEATURES.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of features per vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.fields.len()
    }

    /// Position of a named feature within each vector.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::spotify_v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_v1_excludes_duration() {
        let schema = FeatureSchema::spotify_v1();
        assert_eq!(schema.version(), 1);
        assert_eq!(schema.dimension(), 10);
        assert!(schema.index_of("duration_ms").is_none());
        assert_eq!(schema.index_of("popularity"), Some(0));
        assert_eq!(schema.index_of("valence"), Some(9));
    }

    #[test]
    fn test_new_drops_excluded_field() {
        let schema = FeatureSchema::new(2, ["energy", "duration_ms", "tempo"]).unwrap();
        assert_eq!(schema.fields(), &["energy".to_string(), "tempo".to_string()]);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = FeatureSchema::new(2, ["energy", "energy"]);
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_new_rejects_only_excluded_fields() {
        let result = FeatureSchema::new(2, ["duration_ms"]);
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let result = FeatureSchema::new(2, ["energy", "  "]);
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }
}
