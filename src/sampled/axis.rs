//! Uniformly binned axis shared by sampled curves and surfaces.

use crate::error::{ClRegionError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Relative tolerance on the bin width when bin centers are validated.
const WIDTH_TOLERANCE: f64 = 1e-6;

/// A contiguous range `[min, max]` split into `nbins` equally sized bins.
///
/// Bins are addressed with 0-based indices; bin `i` covers
/// `[min + i*w, min + (i+1)*w)` and its center is `min + (i+0.5)*w`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisFields")]
pub struct UniformAxis {
    min: f64,
    max: f64,
    nbins: usize,
}

/// Serialized form of [`UniformAxis`], validated through [`UniformAxis::new`].
#[derive(Deserialize)]
struct AxisFields {
    min: f64,
    max: f64,
    nbins: usize,
}

impl TryFrom<AxisFields> for UniformAxis {
    type Error = ClRegionError;

    fn try_from(fields: AxisFields) -> Result<Self> {
        Self::new(fields.min, fields.max, fields.nbins)
    }
}

impl UniformAxis {
    /// Create a new axis.
    ///
    /// # Errors
    ///
    /// * `ClRegionError::EmptyInput` if `nbins` is zero
    /// * `ClRegionError::NonUniformBinning` if the range is empty, reversed or not finite
    pub fn new(min: f64, max: f64, nbins: usize) -> Result<Self> {
        if nbins == 0 {
            return Err(ClRegionError::EmptyInput(
                "an axis needs at least one bin".to_string(),
            ));
        }
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(ClRegionError::NonUniformBinning(format!(
                "axis range [{}, {}] is not a valid increasing range",
                min, max
            )));
        }
        Ok(Self { min, max, nbins })
    }

    /// Reconstruct the axis from a list of bin centers.
    ///
    /// The centers must be strictly increasing and equally spaced. A single
    /// center is accepted only together with an explicit width, so it is
    /// rejected here.
    pub fn from_centers(centers: &[f64]) -> Result<Self> {
        match centers.len() {
            0 => {
                return Err(ClRegionError::EmptyInput(
                    "no bin centers given".to_string(),
                ))
            }
            1 => {
                return Err(ClRegionError::NonUniformBinning(
                    "bin width cannot be inferred from a single center".to_string(),
                ))
            }
            _ => {}
        }
        let n = centers.len();
        let width = (centers[n - 1] - centers[0]) / (n - 1) as f64;
        if !(width > 0.0) || !width.is_finite() {
            return Err(ClRegionError::NonUniformBinning(
                "bin centers are not strictly increasing".to_string(),
            ));
        }
        for (i, pair) in centers.windows(2).enumerate() {
            let step = pair[1] - pair[0];
            if (step - width).abs() > WIDTH_TOLERANCE * width {
                return Err(ClRegionError::NonUniformBinning(format!(
                    "bin {} has width {} but the average width is {}",
                    i + 1,
                    step,
                    width
                )));
            }
        }
        Self::new(centers[0] - 0.5 * width, centers[n - 1] + 0.5 * width, n)
    }

    /// Lower edge of the axis.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper edge of the axis.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of bins.
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.nbins as f64
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.bin_width()
    }

    /// Index of the bin containing `x`, clamped to the valid range so that
    /// values on or beyond the edges map to the first or last bin.
    pub fn find_bin(&self, x: f64) -> usize {
        if !(x > self.min) {
            return 0;
        }
        let bin = ((x - self.min) / self.bin_width()).floor() as usize;
        bin.min(self.nbins - 1)
    }

    /// Whether `x` lies inside `[min, max]`.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// All bin centers.
    pub fn centers(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nbins).map(|i| self.bin_center(i)))
    }

    /// The same binning extended by `extra` bins on each side.
    pub fn padded(&self, extra: usize) -> Self {
        let w = self.bin_width();
        Self {
            min: self.min - extra as f64 * w,
            max: self.max + extra as f64 * w,
            nbins: self.nbins + 2 * extra,
        }
    }
}
