//! Core track catalog model for cadenza.
//!
//! This crate defines the track model and its versioned feature schema, the
//! ordered in-memory [`Catalog`], CSV import, the SQLite catalog store, and
//! the feature inspector used to display raw audio features.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod import;
pub mod inspect;
pub mod model;
pub mod store;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use model::{FeatureSchema, Track, TrackSummary};
