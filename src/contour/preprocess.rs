//! Surface preparation before contour tracing.

use crate::sampled::SampledSurface;
use ndarray::{s, Array2};

/// Add one ring of zero-valued bins around the surface.
///
/// The zero ring lies below every contour threshold, so contours of regions
/// reaching the edge of the scan close along the padding instead of ending
/// at the edge.
pub fn pad(surface: &SampledSurface) -> SampledSurface {
    let (nx, ny) = surface.values().dim();
    let mut values = Array2::zeros((nx + 2, ny + 2));
    values
        .slice_mut(s![1..nx + 1, 1..ny + 1])
        .assign(surface.values());
    SampledSurface::from_parts(surface.x_axis().padded(1), surface.y_axis().padded(1), values)
}

/// Turn a chi-square valley into a hill: `v -> offset + min - v`.
///
/// The minimum ends up at `offset` and a chi-square difference `d` above the
/// minimum at `offset - d`.
pub fn hill_transform(surface: &SampledSurface, offset: f64) -> SampledSurface {
    let min = surface.min_value();
    surface.map(|v| offset + min - v)
}
