//! Immutable search snapshots and their atomic replacement.
//!
//! A [`Snapshot`] bundles a catalog with the normalization parameters fitted
//! on it and the index built from its normalized vectors. It is built once,
//! never mutated, and shared by reference. A changed catalog means a new
//! snapshot, published through [`SharedSnapshot::replace`].

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use arc_swap::ArcSwap;
use cadenza_core::inspect::{self, FeatureReading};
use cadenza_core::{Catalog, TrackSummary};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::index::{ExactCosineIndex, NeighborIndex};
use crate::normalize::NormalizationParameters;
use crate::recommend;

/// A catalog, its normalization parameters, and its similarity index.
#[derive(Debug)]
pub struct Snapshot {
    catalog: Catalog,
    params: NormalizationParameters,
    index: Box<dyn NeighborIndex>,
}

impl Snapshot {
    /// Fit, transform, and index a catalog with the exact cosine backend.
    pub fn build(catalog: Catalog) -> Result<Self> {
        Self::build_with(catalog, ExactCosineIndex::build)
    }

    /// Fit and transform a catalog, then index it with a custom backend.
    ///
    /// `make_index` receives one normalized vector per track, in catalog
    /// order.
    pub fn build_with<I, F>(catalog: Catalog, make_index: F) -> Result<Self>
    where
        I: NeighborIndex + 'static,
        F: FnOnce(Vec<Vec<f64>>) -> Result<I>,
    {
        let (params, normalized) = NormalizationParameters::fit_transform(&catalog.feature_rows())?;
        let index = make_index(normalized)?;

        log::info!(
            "Built snapshot: {} tracks, {} features (schema v{})",
            catalog.len(),
            params.dimension(),
            catalog.schema().version()
        );

        Ok(Self {
            catalog,
            params,
            index: Box::new(index),
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn params(&self) -> &NormalizationParameters {
        &self.params
    }

    #[must_use]
    pub fn index(&self) -> &dyn NeighborIndex {
        self.index.as_ref()
    }

    /// The normalized vector of the track at `position`.
    #[must_use]
    pub fn normalized(&self, position: usize) -> Option<&[f64]> {
        self.index.vector(position)
    }

    pub fn recommend(&self, artist: &str, title: &str, k: usize) -> Result<Vec<TrackSummary>> {
        recommend::recommend(&self.catalog, self.index(), artist, title, k)
    }

    pub fn recommend_by_index(&self, position: usize, k: usize) -> Result<Vec<TrackSummary>> {
        recommend::recommend_by_index(&self.catalog, self.index(), position, k)
    }

    /// Raw display values of the named features for one track.
    pub fn inspect<S: AsRef<str>>(
        &self,
        artist: &str,
        title: &str,
        features: &[S],
        precision: u32,
    ) -> Result<Vec<FeatureReading>> {
        let (_, track) = self
            .catalog
            .find(artist, title)
            .ok_or_else(|| Error::TrackNotFound {
                artist: artist.to_string(),
                title: title.to_string(),
            })?;
        Ok(inspect::inspect(
            self.catalog.schema(),
            track,
            features,
            precision,
        )?)
    }
}

/// Build a snapshot on a dedicated thread, giving up after `timeout`.
///
/// On timeout the build thread is left to finish on its own and its result
/// is discarded. The thread is detached, so it never holds up runtime
/// shutdown.
pub async fn build_snapshot_with_timeout(catalog: Catalog, timeout: Duration) -> Result<Snapshot> {
    run_build_with_timeout(timeout, move || Snapshot::build(catalog)).await
}

async fn run_build_with_timeout<F>(timeout: Duration, build: F) -> Result<Snapshot>
where
    F: FnOnce() -> Result<Snapshot> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("cadenza-build".to_string())
        .spawn(move || {
            if tx.send(build()).is_err() {
                log::debug!("Snapshot build finished after its caller gave up");
            }
        })
        .map_err(|e| Error::BuildFailed(e.to_string()))?;

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(Error::BuildFailed(
            "build thread exited without a result".to_string(),
        )),
        Err(_) => Err(Error::BuildTimedOut(timeout)),
    }
}

/// The current snapshot, replaceable without blocking readers.
///
/// Readers take an `Arc<Snapshot>` and keep using it for as long as they
/// hold it, even if a newer snapshot is published meanwhile.
pub struct SharedSnapshot {
    current: ArcSwap<Snapshot>,
}

impl SharedSnapshot {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// The snapshot published most recently.
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Publish `snapshot`, returning the one it replaces.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.current.swap(Arc::new(snapshot))
    }

    /// Build a snapshot for `catalog` and publish it.
    ///
    /// If the build fails the current snapshot stays in place.
    pub fn rebuild(&self, catalog: Catalog) -> Result<Arc<Snapshot>> {
        let snapshot = Snapshot::build(catalog)?;
        Ok(self.replace(snapshot))
    }
}

impl fmt::Debug for SharedSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSnapshot")
            .field("tracks", &self.current.load().catalog.len())
            .finish()
    }
}
