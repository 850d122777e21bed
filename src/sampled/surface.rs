//! Two-dimensional sampled surfaces.

use super::axis::UniformAxis;
use crate::error::{ClRegionError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A statistic sampled on a regular 2-D grid, either a chi-square surface or
/// a p-value surface. Values are indexed `[[ix, iy]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceFields")]
pub struct SampledSurface {
    x_axis: UniformAxis,
    y_axis: UniformAxis,
    values: Array2<f64>,
}

/// Serialized form of [`SampledSurface`], validated through [`SampledSurface::new`].
#[derive(Deserialize)]
struct SurfaceFields {
    x_axis: UniformAxis,
    y_axis: UniformAxis,
    values: Array2<f64>,
}

impl TryFrom<SurfaceFields> for SampledSurface {
    type Error = ClRegionError;

    fn try_from(fields: SurfaceFields) -> Result<Self> {
        Self::new(fields.x_axis, fields.y_axis, fields.values)
    }
}

impl SampledSurface {
    pub fn new(x_axis: UniformAxis, y_axis: UniformAxis, values: Array2<f64>) -> Result<Self> {
        let expected = (x_axis.nbins(), y_axis.nbins());
        if values.dim() != expected {
            return Err(ClRegionError::DimensionMismatch(format!(
                "grid is {}x{} but the values have shape {:?}",
                expected.0,
                expected.1,
                values.dim()
            )));
        }
        Ok(Self {
            x_axis,
            y_axis,
            values,
        })
    }

    /// Assemble a surface whose shape is already known to match the axes.
    pub(crate) fn from_parts(x_axis: UniformAxis, y_axis: UniformAxis, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.dim(), (x_axis.nbins(), y_axis.nbins()));
        Self {
            x_axis,
            y_axis,
            values,
        }
    }

    /// Sample `f(x, y)` at the bin centers of both axes.
    pub fn from_fn<F>(x_axis: UniformAxis, y_axis: UniformAxis, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        let values = Array2::from_shape_fn((x_axis.nbins(), y_axis.nbins()), |(ix, iy)| {
            f(x_axis.bin_center(ix), y_axis.bin_center(iy))
        });
        Self {
            x_axis,
            y_axis,
            values,
        }
    }

    pub fn x_axis(&self) -> &UniformAxis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &UniformAxis {
        &self.y_axis
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[[ix, iy]]
    }

    /// Smallest finite value on the grid.
    pub fn min_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest finite value on the grid.
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// A new surface on the same grid with every value mapped through `f`.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            x_axis: self.x_axis,
            y_axis: self.y_axis,
            values: self.values.mapv(f),
        }
    }
}
