//! Feature standardization.
//!
//! Statistics are fitted once over the whole catalog and then applied,
//! unchanged, to every vector transformed afterwards. Per-query statistics
//! are never computed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-feature mean and population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl NormalizationParameters {
    /// Fit parameters over a raw feature matrix.
    ///
    /// Every row must have the same width as the first. A column whose
    /// values are all equal gets a standard deviation of exactly 0.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyCatalog)?.as_ref();
        let width = first.len();

        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != width) {
            return Err(Error::SchemaMismatch {
                expected: width,
                found: bad.as_ref().len(),
            });
        }

        let n = rows.len() as f64;
        let mut means = Vec::with_capacity(width);
        let mut std_devs = Vec::with_capacity(width);

        for col in 0..width {
            let column = || rows.iter().map(move |r| r.as_ref()[col]);

            if column().all(|v| v == first[col]) {
                means.push(first[col]);
                std_devs.push(0.0);
                continue;
            }

            let mean = column().sum::<f64>() / n;
            let variance = column().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            means.push(mean);
            std_devs.push(variance.sqrt());
        }

        log::debug!("Fitted normalization over {} rows x {} features", rows.len(), width);
        Ok(Self { means, std_devs })
    }

    /// Fit over `rows` and transform each of them.
    pub fn fit_transform<R: AsRef<[f64]>>(rows: &[R]) -> Result<(Self, Vec<Vec<f64>>)> {
        let params = Self::fit(rows)?;
        let normalized = params.transform_all(rows)?;
        Ok((params, normalized))
    }

    /// Standardize one raw vector: `(x - mean) / std`, with `std` replaced
    /// by 1 for zero-variance features.
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        self.check_width(raw)?;
        Ok(raw
            .iter()
            .enumerate()
            .map(|(i, x)| (x - self.means[i]) / self.scale(i))
            .collect())
    }

    pub fn transform_all<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r.as_ref())).collect()
    }

    /// Map a normalized vector back to raw feature space.
    pub fn inverse_transform(&self, normalized: &[f64]) -> Result<Vec<f64>> {
        self.check_width(normalized)?;
        Ok(normalized
            .iter()
            .enumerate()
            .map(|(i, z)| z * self.scale(i) + self.means[i])
            .collect())
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    #[must_use]
    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Whether the feature at `col` had no variance across the catalog.
    #[must_use]
    pub fn is_constant(&self, col: usize) -> bool {
        self.std_devs
            .get(col)
            .is_some_and(|s| *s <= 0.0)
    }

    fn scale(&self, col: usize) -> f64 {
        if self.is_constant(col) {
            1.0
        } else {
            self.std_devs[col]
        }
    }

    fn check_width(&self, vector: &[f64]) -> Result<()> {
        if vector.len() == self.dimension() {
            Ok(())
        } else {
            Err(Error::SchemaMismatch {
                expected: self.dimension(),
                found: vector.len(),
            })
        }
    }
}
