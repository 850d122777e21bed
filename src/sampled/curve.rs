//! One-dimensional sampled curves.

use super::axis::UniformAxis;
use crate::error::{ClRegionError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A statistic sampled on a uniform 1-D grid, typically a `1 - CL` curve
/// coming out of a parameter scan.
///
/// The curve is immutable: transformations such as [`SampledCurve::normalized_to_first`]
/// return new curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveFields")]
pub struct SampledCurve {
    axis: UniformAxis,
    values: Array1<f64>,
}

/// Serialized form of [`SampledCurve`], validated through [`SampledCurve::new`].
#[derive(Deserialize)]
struct CurveFields {
    axis: UniformAxis,
    values: Array1<f64>,
}

impl TryFrom<CurveFields> for SampledCurve {
    type Error = ClRegionError;

    fn try_from(fields: CurveFields) -> Result<Self> {
        Self::new(fields.axis, fields.values)
    }
}

impl SampledCurve {
    /// Create a curve from an axis and one value per bin.
    pub fn new(axis: UniformAxis, values: Array1<f64>) -> Result<Self> {
        if values.len() != axis.nbins() {
            return Err(ClRegionError::DimensionMismatch(format!(
                "axis has {} bins but {} values were given",
                axis.nbins(),
                values.len()
            )));
        }
        Ok(Self { axis, values })
    }

    /// Create a curve from explicit bin centers, validating uniform spacing.
    pub fn from_centers(centers: &[f64], values: &[f64]) -> Result<Self> {
        if centers.len() != values.len() {
            return Err(ClRegionError::DimensionMismatch(format!(
                "{} bin centers but {} values",
                centers.len(),
                values.len()
            )));
        }
        let axis = UniformAxis::from_centers(centers)?;
        Self::new(axis, Array1::from_vec(values.to_vec()))
    }

    /// Sample `f` at the bin centers of `nbins` bins over `[xmin, xmax]`.
    pub fn from_fn<F>(xmin: f64, xmax: f64, nbins: usize, f: F) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        let axis = UniformAxis::new(xmin, xmax, nbins)?;
        let values = axis.centers().mapv(f);
        Ok(Self { axis, values })
    }

    pub fn axis(&self) -> &UniformAxis {
        &self.axis
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false, curves are validated to hold at least one bin.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, bin: usize) -> f64 {
        self.values[bin]
    }

    pub fn center(&self, bin: usize) -> f64 {
        self.axis.bin_center(bin)
    }

    pub fn bin_width(&self) -> f64 {
        self.axis.bin_width()
    }

    pub fn xmin(&self) -> f64 {
        self.axis.min()
    }

    pub fn xmax(&self) -> f64 {
        self.axis.max()
    }

    pub fn find_bin(&self, x: f64) -> usize {
        self.axis.find_bin(x)
    }

    /// Value of the bin containing `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.values[self.find_bin(x)]
    }

    /// Index of the bin holding the largest value (first one on ties).
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v > self.values[best] {
                best = i;
            }
        }
        best
    }

    /// CLs-style normalization: every value divided by the value of the first
    /// bin, which the caller guarantees to be the background-only point.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::InvalidInput` if the first value is zero or not finite
    pub fn normalized_to_first(&self) -> Result<Self> {
        let reference = self.values[0];
        if reference == 0.0 || !reference.is_finite() {
            return Err(ClRegionError::InvalidInput(format!(
                "cannot normalize to a reference value of {}",
                reference
            )));
        }
        Ok(Self {
            axis: self.axis,
            values: self.values.mapv(|v| v / reference),
        })
    }
}
