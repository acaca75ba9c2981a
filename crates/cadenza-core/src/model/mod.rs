pub mod features;
pub mod summary;
pub mod track;

pub use features::{FeatureSchema, EXCLUDED_FEATURES};
pub use summary::TrackSummary;
pub use track::Track;
