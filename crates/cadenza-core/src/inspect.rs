//! Raw feature readout for a single track.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{FeatureSchema, Track};

/// Features shown when the caller does not pick its own subset.
pub const DEFAULT_INSPECT_FEATURES: &[&str] = &["danceability", "energy", "tempo", "valence"];

/// Decimal places used when the caller does not pick its own precision.
pub const DEFAULT_PRECISION: u32 = 3;

/// One raw (unnormalized) feature value, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReading {
    pub name: String,
    pub value: f64,
}

impl FeatureReading {
    /// The feature name with its first letter capitalized.
    #[must_use]
    pub fn label(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Read the named features of a track, in the order requested.
///
/// Fails with [`Error::UnknownFeature`] if a name is not in the schema.
pub fn inspect<S: AsRef<str>>(
    schema: &FeatureSchema,
    track: &Track,
    features: &[S],
    precision: u32,
) -> Result<Vec<FeatureReading>> {
    features
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let value = schema
                .index_of(name)
                .and_then(|i| track.features.get(i))
                .ok_or_else(|| Error::UnknownFeature(name.to_string()))?;
            Ok(FeatureReading {
                name: name.to_string(),
                value: round_to(*value, precision),
            })
        })
        .collect()
}

/// Round half away from zero to `precision` decimal places.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    if !scale.is_finite() {
        return value;
    }
    (value * scale).round() / scale
}
